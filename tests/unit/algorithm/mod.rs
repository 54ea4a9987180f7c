//! Tour construction tests

mod start;
