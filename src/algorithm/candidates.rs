//! Candidate annotation relative to the current tile

use crate::algorithm::strategy::StrategyContext;
use crate::math::geometry::{Compass, bearing, compass, turn_angle};
use crate::spatial::adjacency::touches;
use crate::spatial::tiles::Tile;

/// An open placement seen from the current tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the placement set
    pub index: usize,
    /// Anchor of the candidate
    pub tile: Tile,
    /// Euclidean distance between tile centers, in cells
    pub distance: f64,
    /// Bearing from the current center to the candidate center
    pub bearing: f64,
    /// Turn relative to the previous bearing, 0 while it is undetermined
    pub turn: f64,
    /// Whether the candidate touches the current tile
    pub touches: bool,
}

impl Candidate {
    /// Annotate placement `index` relative to the context's current tile
    ///
    /// Returns `None` if either index has no tile or center.
    pub fn evaluate(ctx: &StrategyContext<'_>, index: usize) -> Option<Self> {
        let from = *ctx.centers.get(ctx.current)?;
        let to = *ctx.centers.get(index)?;
        let current_tile = *ctx.tiles.get(ctx.current)?;
        let tile = *ctx.tiles.get(index)?;

        let heading = bearing(from, to);
        let turn = ctx.prev_angle.map_or(0.0, |prev| turn_angle(prev, heading));

        Some(Self {
            index,
            tile,
            distance: from.distance(to),
            bearing: heading,
            turn,
            touches: touches(current_tile, tile, ctx.tile_size),
        })
    }

    /// Distance in tile widths
    pub fn normalized_distance(&self, tile_size: usize) -> f64 {
        self.distance / tile_size as f64
    }

    /// Compass label of the bearing
    pub fn compass(&self) -> Compass {
        compass(self.bearing)
    }
}

/// Annotate every open placement, in ascending index order
pub fn open_candidates(ctx: &StrategyContext<'_>) -> Vec<Candidate> {
    ctx.open
        .iter()
        .filter_map(|index| Candidate::evaluate(ctx, index))
        .collect()
}

/// Annotate open placements that touch the current tile
pub fn adjacent_candidates(ctx: &StrategyContext<'_>) -> Vec<Candidate> {
    open_candidates(ctx)
        .into_iter()
        .filter(|candidate| candidate.touches)
        .collect()
}
