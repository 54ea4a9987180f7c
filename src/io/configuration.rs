//! Tour constants and runtime configuration defaults

/// Tile edge length used when none is given
pub const DEFAULT_TILE_SIZE: usize = 2;

/// Smallest supported tile edge length
pub const MIN_TILE_SIZE: usize = 2;
/// Largest supported tile edge length
pub const MAX_TILE_SIZE: usize = 3;

// Weighted strategy scoring: one tile of travel costs as much as a 45° turn
/// Weight applied to tile-normalized center distance
pub const DEFAULT_DISTANCE_WEIGHT: f64 = 1.0;
/// Weight applied to turn angle in degrees
pub const DEFAULT_TURN_WEIGHT: f64 = 1.0 / 45.0;

/// Maximum tile-normalized reach considered by the weighted strategy
///
/// Covers edge neighbors and the single-step diagonal (√2 ≈ 1.414).
pub const DEFAULT_MAX_REACH: f64 = 1.5;

/// Slack applied before a turn counts as exceeding the angle tolerance
pub const ANGLE_EPSILON_DEGREES: f64 = 1e-6;

/// Slack applied to center-distance threshold comparisons
pub const DISTANCE_EPSILON: f64 = 1e-9;

// Every placement stores a dense H×W footprint mask
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 128;

/// File extensions accepted as grid input
pub const GRID_FILE_EXTENSIONS: [&str; 2] = ["txt", "png"];

/// Character marking an active cell in text grids
pub const ACTIVE_CHAR: char = '1';
/// Character marking an inactive cell in text grids
pub const INACTIVE_CHAR: char = '0';
/// Lines starting with this character are ignored in text grids
pub const COMMENT_CHAR: char = '#';

/// Threshold for switching from per-file messages to a batch progress bar
pub const MIN_FILES_FOR_PROGRESS_BAR: usize = 2;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
