//! Externally driven tour building
//!
//! An [`InteractiveSession`] offers the open placements touching the current
//! tile and waits for a [`CandidateSelector`] to pick one. Angle tolerance is
//! advisory here: a human is steering, so violations are logged and flagged
//! on the step instead of halting the walk.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::algorithm::candidates::{Candidate, adjacent_candidates};
use crate::algorithm::ordering::{
    OrderingOptions, PathOrderer, StallReason, TourReport, TourStatus,
};
use crate::algorithm::state::{OrderingState, StepMetrics};
use crate::io::error::{Result, TourError};
use crate::spatial::tiles::{PlacementSet, Tile};

/// Answer of a selector to one offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Position in the offered candidate list
    Candidate(usize),
    /// Drop the tour from this index onward and continue from the new tail
    TruncateAt(usize),
    /// Finish the tour at its current length
    Stop,
    /// Input that could not be understood; the offer is repeated
    Unrecognized(String),
}

/// Source of choices for an interactive session
///
/// `select` blocks until a choice is available. There is at most one
/// outstanding offer per session.
pub trait CandidateSelector {
    /// Pick among `candidates`, given the tour built so far
    ///
    /// # Errors
    ///
    /// Returns an error if the selector's input source fails
    fn select(&mut self, tour: &[Tile], candidates: &[Candidate]) -> Result<Selection>;
}

/// Selector replaying a fixed list of answers, then stopping
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelector {
    script: VecDeque<Selection>,
    offers: Vec<Vec<Candidate>>,
}

impl ScriptedSelector {
    /// Create a selector that answers with `script` in order
    pub fn new(script: impl IntoIterator<Item = Selection>) -> Self {
        Self {
            script: script.into_iter().collect(),
            offers: Vec::new(),
        }
    }

    /// Every candidate list offered so far
    pub fn offers(&self) -> &[Vec<Candidate>] {
        &self.offers
    }
}

impl CandidateSelector for ScriptedSelector {
    fn select(&mut self, _tour: &[Tile], candidates: &[Candidate]) -> Result<Selection> {
        self.offers.push(candidates.to_vec());
        Ok(self.script.pop_front().unwrap_or(Selection::Stop))
    }
}

/// Tour built one externally chosen tile at a time
#[derive(Debug, Clone)]
pub struct InteractiveSession<'a> {
    placements: &'a PlacementSet,
    state: OrderingState,
    status: TourStatus,
}

impl<'a> InteractiveSession<'a> {
    /// Open a session, placing the start tile (or fixed tiles) right away
    ///
    /// The strategy in `options` is not used.
    ///
    /// # Errors
    ///
    /// Returns an error if the angle tolerance is negative or not finite
    pub fn new(placements: &'a PlacementSet, options: OrderingOptions) -> Result<Self> {
        let mut orderer = PathOrderer::new(placements, options)?;
        let status = orderer.start();

        Ok(Self {
            placements,
            state: orderer.into_state(),
            status,
        })
    }

    /// Current status
    pub const fn status(&self) -> TourStatus {
        self.status
    }

    /// Walk state, for inspection or export
    pub const fn state(&self) -> &OrderingState {
        &self.state
    }

    /// Hand the walk state out
    pub fn into_state(self) -> OrderingState {
        self.state
    }

    /// Visited anchors so far
    pub fn tour(&self) -> Vec<Tile> {
        self.state.tour(self.placements)
    }

    /// Summary of the session so far
    pub fn report(&self) -> TourReport {
        TourReport::from_state(&self.state, self.placements, self.status)
    }

    /// Open placements touching the current tile, in placement order
    pub fn candidates(&self) -> Vec<Candidate> {
        let open = self.state.open_set();
        self.state
            .context(&open, self.placements)
            .map(|ctx| adjacent_candidates(&ctx))
            .unwrap_or_default()
    }

    /// Move to the candidate at `position` in [`Self::candidates`]
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the session unchanged, if the session is
    /// not walking or `position` is out of range
    pub fn choose(&mut self, position: usize) -> Result<StepMetrics> {
        let candidates = if self.status == TourStatus::Walking {
            self.candidates()
        } else {
            Vec::new()
        };
        let invalid = TourError::InvalidSelection {
            index: position,
            available: candidates.len(),
        };

        let candidate = candidates.get(position).ok_or(invalid)?;
        let metrics = self
            .state
            .advance(candidate.index, self.placements)
            .ok_or(TourError::InvalidSelection {
                index: position,
                available: candidates.len(),
            })?;

        if metrics.exceeds_tolerance {
            warn!(
                from = %metrics.from,
                to = %metrics.to,
                turn = ?metrics.turn,
                limit = ?self.state.max_angle_diff(),
                "move exceeds the angle tolerance"
            );
        } else {
            debug!(from = %metrics.from, to = %metrics.to, "moved");
        }
        Ok(metrics)
    }

    /// Finish the tour at its current length
    pub fn stop(&mut self) -> TourStatus {
        self.status = if self.state.open_count() == 0 {
            TourStatus::Completed
        } else {
            TourStatus::Stalled(StallReason::Stopped)
        };
        self.status
    }

    /// Drop every tile from `index` onward and continue from the new tail
    ///
    /// Returns the removed anchors, oldest first. The offers that follow are
    /// exactly those the session would have made had it halted at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is 0 or not below the tour length
    pub fn truncate(&mut self, index: usize) -> Result<Vec<Tile>> {
        let removed = self.state.truncate(index, self.placements)?;
        self.status = TourStatus::Walking;

        Ok(removed
            .into_iter()
            .filter_map(|i| self.placements.tiles().get(i).copied())
            .collect())
    }

    /// Offer candidates to `selector` until it stops or none remain
    ///
    /// Out-of-range and unrecognized answers are logged and the offer is
    /// repeated without touching the tour.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector fails
    pub fn run<S: CandidateSelector>(&mut self, selector: &mut S) -> Result<TourReport> {
        while self.status == TourStatus::Walking {
            let candidates = self.candidates();
            if candidates.is_empty() {
                self.status = if self.state.open_count() == 0 {
                    TourStatus::Completed
                } else {
                    TourStatus::Stalled(StallReason::NoCandidate)
                };
                break;
            }

            match selector.select(&self.tour(), &candidates)? {
                Selection::Candidate(position) => {
                    if let Err(error) = self.choose(position) {
                        warn!(%error, "selection rejected");
                    }
                }
                Selection::TruncateAt(index) => match self.truncate(index) {
                    Ok(removed) => debug!(index, removed = removed.len(), "tour truncated"),
                    Err(error) => warn!(%error, "truncation rejected"),
                },
                Selection::Stop => {
                    self.stop();
                }
                Selection::Unrecognized(input) => {
                    warn!(input = %input, "unrecognized selection, offering again");
                }
            }
        }

        Ok(self.report())
    }
}
