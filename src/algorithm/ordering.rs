//! Automatic tour ordering
//!
//! [`PathOrderer`] drives a [`NextTileStrategy`] across a placement set:
//!
//! ```text
//! NotStarted ──start──▶ Walking ──step*──▶ Completed
//!                          │                   ▲
//!                          └──────▶ Stalled ───┘ (resume with a new tolerance)
//! ```
//!
//! A stall is a normal outcome. The state it leaves behind can be resumed
//! with a relaxed angle tolerance without recomputing anything.

use std::fmt;

use tracing::{debug, info, warn};

use crate::algorithm::start::StartRule;
use crate::algorithm::state::{OrderingState, StepMetrics, validate_max_angle};
use crate::algorithm::strategy::{NextTile, NextTileStrategy};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::tiles::{PlacementSet, Tile};

/// Why a walk halted before visiting every open placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StallReason {
    /// The strategy found no placement to move to
    NoCandidate,
    /// The chosen move turned more than the tolerance allows
    AngleTolerance {
        /// Turn the rejected move would have made
        turn: f64,
        /// Tolerance in force
        limit: f64,
        /// Placement the strategy proposed
        rejected: Tile,
    },
    /// An interactive driver was told to stop
    Stopped,
}

impl fmt::Display for StallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidate => f.write_str("no reachable candidate"),
            Self::AngleTolerance {
                turn,
                limit,
                rejected,
            } => write!(
                f,
                "turn of {turn:.1}° towards {rejected} exceeds the {limit:.1}° tolerance"
            ),
            Self::Stopped => f.write_str("stopped by the selector"),
        }
    }
}

/// Lifecycle of a walk
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TourStatus {
    /// No tile placed yet
    #[default]
    NotStarted,
    /// Tiles are being added
    Walking,
    /// No open placement remains
    Completed,
    /// Halted with open placements left
    Stalled(StallReason),
}

impl TourStatus {
    /// Whether the walk has halted
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stalled(_))
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Walking => f.write_str("walking"),
            Self::Completed => f.write_str("completed"),
            Self::Stalled(reason) => write!(f, "stalled: {reason}"),
        }
    }
}

/// Options for one ordering run
#[derive(Debug, Clone, Default)]
pub struct OrderingOptions {
    /// How the first tile is chosen when no fixed tiles are given
    pub start: StartRule,
    /// Angle tolerance in degrees, `None` for unbounded
    pub max_angle_diff: Option<f64>,
    /// Strategy picking each next tile
    pub strategy: NextTileStrategy,
    /// Tiles that open the walk in the given order, overriding `start`
    pub fixed_tiles: Vec<Tile>,
}

impl OrderingOptions {
    /// Set the start rule
    #[must_use]
    pub fn with_start(mut self, start: StartRule) -> Self {
        self.start = start;
        self
    }

    /// Set the strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: NextTileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the angle tolerance
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or not finite
    pub fn with_max_angle_diff(mut self, max_angle_diff: Option<f64>) -> Result<Self> {
        self.max_angle_diff = validate_max_angle(max_angle_diff)?;
        Ok(self)
    }

    /// Set the tiles that open the walk
    #[must_use]
    pub fn with_fixed_tiles(mut self, fixed_tiles: Vec<Tile>) -> Self {
        self.fixed_tiles = fixed_tiles;
        self
    }
}

/// Outcome of a single [`PathOrderer::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The walk started on this placement index
    Started(usize),
    /// The walk moved one tile
    Moved(StepMetrics),
    /// The walk is over
    Halted(TourStatus),
}

/// Summary of a walk for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct TourReport {
    /// Final (or current) status
    pub status: TourStatus,
    /// Visited anchors in visiting order
    pub tour: Vec<Tile>,
    /// Metrics of every move
    pub steps: Vec<StepMetrics>,
    /// Number of visited placements
    pub visited: usize,
    /// Open placements left unvisited
    pub remaining: usize,
    /// Grid cells covered by the tour
    pub covered_cells: usize,
    /// Active cells of the grid
    pub active_cells: usize,
    /// Total placements enumerated
    pub placements: usize,
}

impl TourReport {
    /// Build a report from a walk state
    pub fn from_state(
        state: &OrderingState,
        placements: &PlacementSet,
        status: TourStatus,
    ) -> Self {
        Self {
            status,
            tour: state.tour(placements),
            steps: state.steps().to_vec(),
            visited: state.order().len(),
            remaining: state.open_count(),
            covered_cells: state.covered().count(),
            active_cells: placements.active_cells(),
            placements: placements.len(),
        }
    }

    /// Share of active cells covered by the tour, in [0, 1]
    pub fn coverage(&self) -> f64 {
        if self.active_cells == 0 {
            0.0
        } else {
            self.covered_cells as f64 / self.active_cells as f64
        }
    }
}

/// Strategy-driven walk over a placement set
#[derive(Debug, Clone)]
pub struct PathOrderer<'a> {
    placements: &'a PlacementSet,
    options: OrderingOptions,
    state: OrderingState,
    status: TourStatus,
}

impl<'a> PathOrderer<'a> {
    /// Prepare a walk; nothing is visited until [`Self::start`] or [`Self::run`]
    ///
    /// # Errors
    ///
    /// Returns an error if the angle tolerance is negative or not finite
    pub fn new(placements: &'a PlacementSet, options: OrderingOptions) -> Result<Self> {
        let max_angle_diff = validate_max_angle(options.max_angle_diff)?;
        Ok(Self {
            placements,
            state: OrderingState::new(placements, max_angle_diff),
            options,
            status: TourStatus::NotStarted,
        })
    }

    /// Continue a walk from a previously exported state
    ///
    /// # Errors
    ///
    /// Returns an error if the state was built for a different placement set
    pub fn from_state(
        placements: &'a PlacementSet,
        strategy: NextTileStrategy,
        state: OrderingState,
    ) -> Result<Self> {
        if state.centers().len() != placements.len()
            || state.tile_size() != placements.tile_size().get()
        {
            return Err(invalid_parameter(
                "state",
                &format!("{} placements, k={}", state.centers().len(), state.tile_size()),
                &format!(
                    "does not match placement set of {} placements, k={}",
                    placements.len(),
                    placements.tile_size().get()
                ),
            ));
        }

        let status = if state.order().is_empty() {
            TourStatus::NotStarted
        } else {
            TourStatus::Walking
        };
        Ok(Self {
            placements,
            options: OrderingOptions {
                max_angle_diff: state.max_angle_diff(),
                strategy,
                ..OrderingOptions::default()
            },
            state,
            status,
        })
    }

    /// Current status
    pub const fn status(&self) -> TourStatus {
        self.status
    }

    /// Walk state, for inspection
    pub const fn state(&self) -> &OrderingState {
        &self.state
    }

    /// Hand the walk state out, e.g. for external persistence
    pub fn into_state(self) -> OrderingState {
        self.state
    }

    /// Placement set being walked
    pub const fn placements(&self) -> &'a PlacementSet {
        self.placements
    }

    /// Visited anchors so far
    pub fn tour(&self) -> Vec<Tile> {
        self.state.tour(self.placements)
    }

    /// Summary of the walk so far
    pub fn report(&self) -> TourReport {
        TourReport::from_state(&self.state, self.placements, self.status)
    }

    /// Place the opening tiles and enter `Walking`
    ///
    /// Fixed tiles take precedence over the start rule. Fixed tiles that are
    /// not placements, repeat, or overlap an earlier one are skipped. With
    /// no placements at all the walk completes immediately.
    pub fn start(&mut self) -> TourStatus {
        if self.status != TourStatus::NotStarted {
            return self.status;
        }

        if !self.options.fixed_tiles.is_empty() {
            self.seed_fixed_tiles();
        }
        if self.state.order().is_empty() {
            if let Some(index) = self.options.start.resolve(self.placements) {
                self.state.start_at(index, self.placements);
            }
        }

        self.status = if self.state.order().is_empty() {
            TourStatus::Completed
        } else {
            TourStatus::Walking
        };
        self.status
    }

    fn seed_fixed_tiles(&mut self) {
        let fixed = self.options.fixed_tiles.clone();
        for tile in fixed {
            let Some(index) = self.placements.index_of(tile) else {
                warn!(tile = %tile, "fixed tile is not a placement, skipping");
                continue;
            };

            let placed = if self.state.order().is_empty() {
                self.state.start_at(index, self.placements)
            } else {
                // Seeds are taken as given, the tolerance applies afterwards
                self.state.advance(index, self.placements).is_some()
            };
            if !placed {
                warn!(tile = %tile, "fixed tile repeats or overlaps an earlier one, skipping");
            }
        }
    }

    /// Advance the walk by one transition
    pub fn step(&mut self) -> StepOutcome {
        match self.status {
            TourStatus::NotStarted => {
                let status = self.start();
                match self.state.current() {
                    Some(index) if status == TourStatus::Walking => StepOutcome::Started(index),
                    _ => StepOutcome::Halted(status),
                }
            }
            TourStatus::Walking => self.walk_once(),
            terminal => StepOutcome::Halted(terminal),
        }
    }

    fn walk_once(&mut self) -> StepOutcome {
        let open = self.state.open_set();
        if open.is_empty() {
            return self.halt(TourStatus::Completed);
        }

        let next = self
            .state
            .context(&open, self.placements)
            .and_then(|ctx| self.options.strategy.next_tile(&ctx))
            .filter(|&index| open.contains(index));
        let Some(next) = next else {
            return self.halt(TourStatus::Stalled(StallReason::NoCandidate));
        };

        let Some((_, turn)) = self.state.preview(next) else {
            return self.halt(TourStatus::Stalled(StallReason::NoCandidate));
        };
        if self.state.exceeds_tolerance(turn) {
            let rejected = self.placements.tiles().get(next).copied();
            if let (Some(turn), Some(limit), Some(rejected)) =
                (turn, self.state.max_angle_diff(), rejected)
            {
                return self.halt(TourStatus::Stalled(StallReason::AngleTolerance {
                    turn,
                    limit,
                    rejected,
                }));
            }
        }

        match self.state.advance(next, self.placements) {
            Some(metrics) => {
                debug!(
                    from = %metrics.from,
                    to = %metrics.to,
                    bearing = metrics.bearing,
                    turn = ?metrics.turn,
                    "moved"
                );
                StepOutcome::Moved(metrics)
            }
            None => self.halt(TourStatus::Stalled(StallReason::NoCandidate)),
        }
    }

    fn halt(&mut self, status: TourStatus) -> StepOutcome {
        self.status = status;
        info!(
            strategy = %self.options.strategy,
            visited = self.state.order().len(),
            remaining = self.state.open_count(),
            "tour {status}"
        );
        StepOutcome::Halted(status)
    }

    /// Walk until the tour completes or stalls
    pub fn run(&mut self) -> TourReport {
        while !self.status.is_terminal() {
            self.step();
        }
        self.report()
    }

    /// Continue a stalled walk under a new angle tolerance
    ///
    /// The walk picks up exactly where it halted, keeping every visited tile.
    /// A completed walk is left as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or not finite
    pub fn resume(&mut self, max_angle_diff: Option<f64>) -> Result<TourReport> {
        let max_angle_diff = validate_max_angle(max_angle_diff)?;
        self.options.max_angle_diff = max_angle_diff;
        self.state.set_max_angle_diff(max_angle_diff);

        if matches!(self.status, TourStatus::Stalled(_)) {
            self.status = TourStatus::Walking;
        }
        Ok(self.run())
    }
}
