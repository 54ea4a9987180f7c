//! Walk state shared by the automatic and interactive drivers
//!
//! Every mutation is applied per step as a whole: a rejected step leaves
//! the state untouched.

use crate::algorithm::bitset::IndexBitset;
use crate::algorithm::strategy::StrategyContext;
use crate::io::configuration::ANGLE_EPSILON_DEGREES;
use crate::io::error::{Result, TourError, invalid_parameter};
use crate::math::geometry::{Compass, Point, bearing, center, compass, turn_angle};
use crate::spatial::tiles::{PlacementSet, Tile};

/// Direction metrics of one move between consecutive tiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    /// Tile the move started on
    pub from: Tile,
    /// Tile the move ended on
    pub to: Tile,
    /// Bearing of the move in degrees
    pub bearing: f64,
    /// Turn relative to the previous move, `None` for the first move
    pub turn: Option<f64>,
    /// Compass label of the bearing
    pub compass: Compass,
    /// Whether the turn exceeded the angle tolerance in force at the time
    pub exceeds_tolerance: bool,
}

/// Check an angle tolerance in degrees
///
/// # Errors
///
/// Returns an error if the tolerance is negative or not finite
pub fn validate_max_angle(max_angle_diff: Option<f64>) -> Result<Option<f64>> {
    match max_angle_diff {
        Some(limit) if !limit.is_finite() || limit < 0.0 => Err(invalid_parameter(
            "max_angle_diff",
            &limit,
            &"must be a finite number of degrees >= 0",
        )),
        other => Ok(other),
    }
}

/// Progress of one walk over a placement set
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingState {
    order: Vec<usize>,
    unused: IndexBitset,
    // Unused placements sharing no cell with a visited one
    open: IndexBitset,
    covered: IndexBitset,
    prev_angle: Option<f64>,
    centers: Vec<Point>,
    tile_size: usize,
    max_angle_diff: Option<f64>,
    steps: Vec<StepMetrics>,
}

impl OrderingState {
    /// Create an empty walk with every placement unused
    pub fn new(placements: &PlacementSet, max_angle_diff: Option<f64>) -> Self {
        let tile_size = placements.tile_size().get();
        let centers = placements
            .tiles()
            .iter()
            .map(|&tile| center(tile, tile_size))
            .collect();

        Self {
            order: Vec::new(),
            unused: IndexBitset::all(placements.len()),
            open: IndexBitset::all(placements.len()),
            covered: IndexBitset::new(placements.grid_mask().active().capacity()),
            prev_angle: None,
            centers,
            tile_size,
            max_angle_diff,
            steps: Vec::new(),
        }
    }

    /// Visited placement indices in visiting order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Placements not yet visited
    pub const fn unused(&self) -> &IndexBitset {
        &self.unused
    }

    /// Grid cells covered by visited placements
    pub const fn covered(&self) -> &IndexBitset {
        &self.covered
    }

    /// Index of the tile the walk is on
    pub fn current(&self) -> Option<usize> {
        self.order.last().copied()
    }

    /// Bearing of the last move, `None` until two tiles are visited
    pub const fn prev_angle(&self) -> Option<f64> {
        self.prev_angle
    }

    /// Cached center of every placement
    pub fn centers(&self) -> &[Point] {
        &self.centers
    }

    /// Tile edge length
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Angle tolerance in degrees, `None` when unbounded
    pub const fn max_angle_diff(&self) -> Option<f64> {
        self.max_angle_diff
    }

    /// Replace the angle tolerance
    pub fn set_max_angle_diff(&mut self, max_angle_diff: Option<f64>) {
        self.max_angle_diff = max_angle_diff;
    }

    /// Metrics of every move so far
    pub fn steps(&self) -> &[StepMetrics] {
        &self.steps
    }

    /// Visited anchors in visiting order
    pub fn tour(&self, placements: &PlacementSet) -> Vec<Tile> {
        self.order
            .iter()
            .filter_map(|&index| placements.tiles().get(index).copied())
            .collect()
    }

    /// Whether a placement is unused and shares no cell with visited ones
    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains(index)
    }

    /// All currently open placements
    pub fn open_set(&self) -> IndexBitset {
        self.open.clone()
    }

    /// Strategy inputs for the current tile
    pub fn context<'a>(
        &'a self,
        open: &'a IndexBitset,
        placements: &'a PlacementSet,
    ) -> Option<StrategyContext<'a>> {
        Some(StrategyContext {
            current: self.current()?,
            prev_angle: self.prev_angle,
            centers: &self.centers,
            open,
            tile_size: self.tile_size,
            tiles: placements.tiles(),
        })
    }

    /// Bearing and turn a move from the current tile to `next` would have
    pub fn preview(&self, next: usize) -> Option<(f64, Option<f64>)> {
        let from = *self.centers.get(self.current()?)?;
        let to = *self.centers.get(next)?;
        let heading = bearing(from, to);
        Some((heading, self.prev_angle.map(|prev| turn_angle(prev, heading))))
    }

    /// Whether a turn breaks the angle tolerance
    pub fn exceeds_tolerance(&self, turn: Option<f64>) -> bool {
        match (turn, self.max_angle_diff) {
            (Some(turn), Some(limit)) => turn > limit + ANGLE_EPSILON_DEGREES,
            _ => false,
        }
    }

    /// Place the first tile of the walk
    ///
    /// Returns `false` without changes if the walk already started or the
    /// index is not a placement.
    pub fn start_at(&mut self, index: usize, placements: &PlacementSet) -> bool {
        if !self.order.is_empty() || !self.is_open(index) {
            return false;
        }
        self.mark_visited(index, placements);
        true
    }

    /// Move from the current tile to `next`
    ///
    /// Returns `None` without changes if the walk has not started or `next`
    /// is not open. The angle tolerance is only recorded here; enforcing it
    /// is up to the driver.
    pub fn advance(&mut self, next: usize, placements: &PlacementSet) -> Option<StepMetrics> {
        if !self.is_open(next) {
            return None;
        }
        let from = *placements.tiles().get(self.current()?)?;
        let to = *placements.tiles().get(next)?;
        let (heading, turn) = self.preview(next)?;

        let metrics = StepMetrics {
            from,
            to,
            bearing: heading,
            turn,
            compass: compass(heading),
            exceeds_tolerance: self.exceeds_tolerance(turn),
        };

        self.mark_visited(next, placements);
        if self.order.len() >= 2 {
            self.prev_angle = Some(heading);
        }
        self.steps.push(metrics);
        Some(metrics)
    }

    /// Drop every visited tile from `index` onward and return them, oldest first
    ///
    /// The walk continues from the new last tile with the bearing of the
    /// move that reached it, exactly as if it had halted there.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is 0 or not below the tour length
    pub fn truncate(&mut self, index: usize, placements: &PlacementSet) -> Result<Vec<usize>> {
        if index == 0 || index >= self.order.len() {
            return Err(TourError::InvalidTruncation {
                index,
                len: self.order.len(),
            });
        }

        let removed = self.order.split_off(index);
        for &dropped in &removed {
            self.unused.insert(dropped);
        }
        self.steps.truncate(index - 1);

        self.open = IndexBitset::all(self.open.capacity());
        self.covered = IndexBitset::new(self.covered.capacity());
        for kept in self.order.clone() {
            self.occupy(kept, placements);
        }
        self.prev_angle = self.steps.last().map(|step| step.bearing);

        Ok(removed)
    }

    /// Number of placements that are still open
    pub fn open_count(&self) -> usize {
        self.open.count()
    }

    fn mark_visited(&mut self, index: usize, placements: &PlacementSet) {
        self.order.push(index);
        self.unused.remove(index);
        self.occupy(index, placements);
    }

    // Block every placement overlapping `index` and cover its cells
    fn occupy(&mut self, index: usize, placements: &PlacementSet) {
        for blocked in placements.overlapping(index) {
            self.open.remove(blocked);
        }
        for cell in placements.cells(index) {
            self.covered.insert(cell);
        }
    }
}
