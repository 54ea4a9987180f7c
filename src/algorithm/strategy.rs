//! Next-tile selection strategies
//!
//! Each strategy looks at the open placements from the current tile and
//! names the one to visit next. Strategies are stateless: everything they
//! need arrives in a [`StrategyContext`], and they only ever return indices
//! contained in `ctx.open`.

use std::cmp::Ordering;
use std::fmt;

use crate::algorithm::bitset::IndexBitset;
use crate::algorithm::candidates::{Candidate, adjacent_candidates, open_candidates};
use crate::io::configuration::{
    ANGLE_EPSILON_DEGREES, DEFAULT_DISTANCE_WEIGHT, DEFAULT_MAX_REACH, DEFAULT_TURN_WEIGHT,
    DISTANCE_EPSILON,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::geometry::Point;
use crate::spatial::tiles::Tile;

/// Inputs handed to a strategy for one decision
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    /// Index of the tile the walk is on
    pub current: usize,
    /// Bearing of the last move, `None` until two tiles are visited
    pub prev_angle: Option<f64>,
    /// Center of every placement, index-aligned with `tiles`
    pub centers: &'a [Point],
    /// Placements that may still be visited
    pub open: &'a IndexBitset,
    /// Tile edge length
    pub tile_size: usize,
    /// Anchor of every placement
    pub tiles: &'a [Tile],
}

/// Picks the next tile of a walk
pub trait NextTile {
    /// Choose an index from `ctx.open`, or `None` to halt the walk
    fn next_tile(&self, ctx: &StrategyContext<'_>) -> Option<usize>;
}

/// Scoring parameters for the weighted strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Cost per tile width of center distance
    pub distance: f64,
    /// Cost per degree of turn
    pub turn: f64,
    /// Largest tile-normalized distance a scored candidate may have
    pub max_reach: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE_WEIGHT,
            turn: DEFAULT_TURN_WEIGHT,
            max_reach: DEFAULT_MAX_REACH,
        }
    }
}

impl ScoreWeights {
    /// Validate and build a weight set
    ///
    /// # Errors
    ///
    /// Returns an error if a weight is negative or not finite, or if the
    /// reach is not strictly positive
    pub fn new(distance: f64, turn: f64, max_reach: f64) -> Result<Self> {
        for (parameter, value) in [("distance_weight", distance), ("turn_weight", turn)] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &"must be a finite non-negative number",
                ));
            }
        }
        if !max_reach.is_finite() || max_reach <= 0.0 {
            return Err(invalid_parameter(
                "max_reach",
                &max_reach,
                &"must be a finite positive number of tile widths",
            ));
        }

        Ok(Self {
            distance,
            turn,
            max_reach,
        })
    }

    fn score(&self, candidate: &Candidate, tile_size: usize) -> f64 {
        self.distance
            .mul_add(candidate.normalized_distance(tile_size), self.turn * candidate.turn)
    }
}

/// The closed family of next-tile strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextTileStrategy {
    /// Closest open center, any distance
    NearestNeighbor,

    /// Smallest turn from the previous bearing, any distance
    ///
    /// Until the direction is established every turn costs 0, so the first
    /// open placement wins the second step.
    MinimumTurn,

    /// Weighted distance and turn among touching placements within reach
    ///
    /// Falls back to the closest touching placement when nothing is within
    /// reach.
    Weighted(ScoreWeights),

    /// Smallest turn among touching placements no farther than one diagonal
    /// step, ties broken by distance
    ///
    /// Shares the weighted strategy's fallback.
    PreferSmallTurn,
}

impl Default for NextTileStrategy {
    fn default() -> Self {
        Self::Weighted(ScoreWeights::default())
    }
}

impl NextTileStrategy {
    /// Stable short name used on the command line and in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NearestNeighbor => "nearest",
            Self::MinimumTurn => "min-turn",
            Self::Weighted(_) => "weighted",
            Self::PreferSmallTurn => "prefer-small-turn",
        }
    }
}

impl fmt::Display for NextTileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl NextTile for NextTileStrategy {
    fn next_tile(&self, ctx: &StrategyContext<'_>) -> Option<usize> {
        let chosen = match self {
            Self::NearestNeighbor => nearest_neighbor(ctx),
            Self::MinimumTurn => minimum_turn(ctx),
            Self::Weighted(weights) => weighted(ctx, weights),
            Self::PreferSmallTurn => prefer_small_turn(ctx),
        };
        chosen.map(|candidate| candidate.index)
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// min_by keeps the first of equal elements, so ties go to the lowest index
fn nearest_neighbor(ctx: &StrategyContext<'_>) -> Option<Candidate> {
    open_candidates(ctx)
        .into_iter()
        .min_by(|a, b| compare_f64(a.distance, b.distance))
}

fn minimum_turn(ctx: &StrategyContext<'_>) -> Option<Candidate> {
    open_candidates(ctx)
        .into_iter()
        .min_by(|a, b| compare_f64(a.turn, b.turn))
}

fn weighted(ctx: &StrategyContext<'_>, weights: &ScoreWeights) -> Option<Candidate> {
    let adjacent = adjacent_candidates(ctx);
    let reach = weights.max_reach + DISTANCE_EPSILON;

    adjacent
        .iter()
        .filter(|c| c.normalized_distance(ctx.tile_size) <= reach)
        .min_by(|a, b| {
            compare_f64(
                weights.score(a, ctx.tile_size),
                weights.score(b, ctx.tile_size),
            )
        })
        .copied()
        .or_else(|| closest(&adjacent))
}

fn prefer_small_turn(ctx: &StrategyContext<'_>) -> Option<Candidate> {
    let adjacent = adjacent_candidates(ctx);
    let diagonal = ctx.tile_size as f64 * std::f64::consts::SQRT_2 + DISTANCE_EPSILON;

    adjacent
        .iter()
        .filter(|c| c.distance <= diagonal)
        .min_by(|a, b| {
            if (a.turn - b.turn).abs() <= ANGLE_EPSILON_DEGREES {
                compare_f64(a.distance, b.distance)
            } else {
                compare_f64(a.turn, b.turn)
            }
        })
        .copied()
        .or_else(|| closest(&adjacent))
}

fn closest(candidates: &[Candidate]) -> Option<Candidate> {
    candidates
        .iter()
        .min_by(|a, b| compare_f64(a.distance, b.distance))
        .copied()
}
