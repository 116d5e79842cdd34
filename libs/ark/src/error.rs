//! Error types for ARK parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing an ARK string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArkError {
    /// The string does not contain exactly one `ark:` marker.
    #[error("not a valid ARK: missing 'ark:' marker")]
    MissingMarker,

    /// The path after the marker has fewer than two segments.
    #[error("not a valid ARK: expected '<naan>/<name>' after the marker")]
    TooFewSegments,

    /// The NAAN segment is not a non-negative integer.
    #[error("ARK NAAN must be a non-negative integer, got '{0}'")]
    InvalidNaan(String),
}

impl ArkError {
    /// Returns true if this error indicates a bad NAAN segment.
    pub fn is_naan_error(&self) -> bool {
        matches!(self, ArkError::InvalidNaan(_))
    }
}
