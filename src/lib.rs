//! Square tile placement enumeration and angle-constrained tour ordering
//!
//! Given a binary grid and a tile size k, the crate finds every position
//! where a k×k tile covers only active cells, then orders a non-overlapping
//! subset of those placements into a tour whose consecutive tiles touch and
//! whose turns stay within a tolerance. Tours are built either by a
//! pluggable strategy or by an external selector choosing each step.

#![forbid(unsafe_code)]

/// Tour construction: strategies, walk state and drivers
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Geometry of tile centers, bearings and turns
pub mod math;
/// Grid masks, tile placements and adjacency
pub mod spatial;

pub use io::error::{Result, TourError};
