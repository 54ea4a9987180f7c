//! Error types for grid validation, tour configuration and interactive input

use std::fmt;
use std::path::PathBuf;

/// Main error type for all enumeration and ordering operations
#[derive(Debug)]
pub enum TourError {
    /// Grid is empty, not rectangular, or contains values other than 0 and 1
    InvalidGrid {
        /// Description of what's wrong with the grid
        reason: String,
    },

    /// Parameter validation failed (tile size, weights, tolerances)
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Interactive selection does not name an offered candidate
    InvalidSelection {
        /// Position the caller asked for
        index: usize,
        /// Number of candidates on offer
        available: usize,
    },

    /// Truncation point lies outside the current tour
    ///
    /// Valid points are `1..len`; the start tile can never be removed.
    InvalidTruncation {
        /// Requested truncation index
        index: usize,
        /// Current tour length
        len: usize,
    },

    /// Text grid file could not be parsed
    GridParse {
        /// Path of the grid file
        path: PathBuf,
        /// One-based line number of the offending row
        line: usize,
        /// Description of the syntax problem
        reason: String,
    },

    /// Failed to decode a PNG grid mask
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl TourError {
    /// Whether this error rejects the grid or tour parameters themselves
    ///
    /// Configuration errors are fatal: retrying with the same input fails again.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGrid { .. } | Self::InvalidParameter { .. } | Self::GridParse { .. }
        )
    }
}

impl fmt::Display for TourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid { reason } => write!(f, "Invalid grid: {reason}"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidSelection { index, available } => {
                write!(
                    f,
                    "Selection {index} is out of range ({available} candidates available)"
                )
            }
            Self::InvalidTruncation { index, len } => {
                write!(
                    f,
                    "Cannot truncate tour of length {len} at index {index} (valid: 1..{len})"
                )
            }
            Self::GridParse { path, line, reason } => {
                write!(
                    f,
                    "Failed to parse grid '{}' at line {line}: {reason}",
                    path.display()
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for TourError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TourError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Convenience type alias for tour results
pub type Result<T> = std::result::Result<T, TourError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TourError {
    TourError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid grid error
pub fn invalid_grid(reason: &impl ToString) -> TourError {
    TourError::InvalidGrid {
        reason: reason.to_string(),
    }
}
