//! Tour construction over an enumerated placement set

/// Fixed-width bitset for cell masks and placement index sets
pub mod bitset;
/// Candidate annotation relative to the current tile
pub mod candidates;
/// Externally driven, truncatable tour building
pub mod interactive;
/// Strategy-driven tour ordering state machine
pub mod ordering;
/// Start tile selection rules
pub mod start;
/// Walk state shared by both drivers
pub mod state;
/// Next-tile selection strategies
pub mod strategy;
