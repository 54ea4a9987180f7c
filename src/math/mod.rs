//! Mathematical utilities for tour construction

/// Tile centers, bearings, turn angles and compass labels
pub mod geometry;
