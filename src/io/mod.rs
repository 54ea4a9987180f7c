//! Input/output, configuration and error handling

/// Command-line front-end
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Grid file loading
pub mod grid_file;
/// Batch progress display
pub mod progress;
