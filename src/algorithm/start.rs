//! Start tile selection rules

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::math::geometry::center;
use crate::spatial::tiles::{PlacementSet, Tile};

type SelectFn = dyn Fn(&PlacementSet) -> Option<usize> + Send + Sync;

/// Caller-supplied start selector, returning a placement index
///
/// Wraps any closure, so a selector may carry its own state.
#[derive(Clone)]
pub struct StartSelector(Arc<SelectFn>);

impl StartSelector {
    /// Wrap a selector function or closure
    pub fn new<F>(select: F) -> Self
    where
        F: Fn(&PlacementSet) -> Option<usize> + Send + Sync + 'static,
    {
        Self(Arc::new(select))
    }

    /// Ask the selector for a placement index
    pub fn select(&self, placements: &PlacementSet) -> Option<usize> {
        (self.0)(placements)
    }
}

impl fmt::Debug for StartSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StartSelector(..)")
    }
}

/// How the first tile of a walk is chosen
#[derive(Debug, Clone, Default)]
pub enum StartRule {
    /// Topmost row, leftmost column within it
    #[default]
    TopLeft,
    /// Topmost row, rightmost column within it
    TopRight,
    /// The given anchor, or the placement whose center is nearest to it
    Custom(Tile),
    /// Delegate to a function; invalid answers fall back to [`StartRule::TopLeft`]
    Selector(StartSelector),
}

impl StartRule {
    /// Resolve the rule to a placement index, `None` only for an empty set
    pub fn resolve(&self, placements: &PlacementSet) -> Option<usize> {
        let tiles = placements.tiles();
        match self {
            Self::TopLeft => top_left(tiles),
            Self::TopRight => tiles
                .iter()
                .enumerate()
                .min_by_key(|(_, tile)| (tile.row, Reverse(tile.col)))
                .map(|(index, _)| index),
            Self::Custom(requested) => nearest_to(placements, *requested),
            Self::Selector(selector) => match selector.select(placements) {
                Some(index) if index < tiles.len() => Some(index),
                answer => {
                    if !tiles.is_empty() {
                        warn!(
                            ?answer,
                            placements = tiles.len(),
                            "start selector gave no usable placement, using top-left"
                        );
                    }
                    top_left(tiles)
                }
            },
        }
    }
}

fn top_left(tiles: &[Tile]) -> Option<usize> {
    tiles
        .iter()
        .enumerate()
        .min_by_key(|(_, tile)| (tile.row, tile.col))
        .map(|(index, _)| index)
}

fn nearest_to(placements: &PlacementSet, requested: Tile) -> Option<usize> {
    if let Some(index) = placements.index_of(requested) {
        return Some(index);
    }

    let k = placements.tile_size().get();
    let target = center(requested, k);
    let substitute = placements
        .tiles()
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = center(**a, k).distance(target);
            let db = center(**b, k).distance(target);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(index, _)| index)?;

    if let Some(tile) = placements.tiles().get(substitute) {
        warn!(
            requested = %requested,
            substitute = %tile,
            "start tile is not a placement, using the nearest one"
        );
    }
    Some(substitute)
}
