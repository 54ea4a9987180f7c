//! Spatial data structures for grids and tiles
//!
//! This module contains spatial-related functionality including:
//! - Grid validation and the active-cell mask
//! - Tile placements and their enumeration
//! - Overlap and touch predicates between placements

/// Overlap and touch predicates
pub mod adjacency;
/// Grid validation and active-cell masks
pub mod grid;
/// Tile anchors, placements and the placement enumerator
pub mod tiles;

pub use grid::{Grid, GridMask};
pub use tiles::{Placement, PlacementSet, Tile, TileSize};
