//! Error types for geocover operations.

use thiserror::Error;

/// Errors returned by covering, conversion, and hasher operations.
///
/// All variants are local and non-retryable: the caller must correct the
/// input (or pass `overwrite`) and invoke the operation again.
#[derive(Error, Debug)]
pub enum GeocoverError {
    /// Input failed validation (bad precision, degenerate shape, wrong
    /// document type, out-of-range threshold).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A session slot already holds a computed value and `overwrite` was
    /// not requested.
    #[error("{0} already computed; set overwrite to replace it")]
    AlreadyComputed(&'static str),

    /// An operation requires a session slot that has not been set.
    #[error("missing input: {0} has not been set")]
    MissingInput(&'static str),

    /// The covering window is larger than the configured cell budget.
    #[error("grid window of {cells} cells exceeds the limit of {limit}")]
    ResourceLimitExceeded { cells: usize, limit: usize },

    /// A geohash string could not be encoded or decoded.
    #[error("invalid geohash: {0}")]
    InvalidGeohash(#[from] geohash::GeohashError),
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GeocoverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeocoverError::InvalidInput("precision 0 out of range".to_string());
        assert!(err.to_string().contains("invalid input"));

        let err = GeocoverError::AlreadyComputed("geohash codes");
        assert!(err.to_string().contains("overwrite"));

        let err = GeocoverError::MissingInput("region");
        assert!(err.to_string().contains("region"));

        let err = GeocoverError::ResourceLimitExceeded {
            cells: 2048,
            limit: 1024,
        };
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn test_geohash_error_conversion() {
        let result = geohash::decode("not a geohash!");
        assert!(result.is_err());

        let err: GeocoverError = result.unwrap_err().into();
        assert!(matches!(err, GeocoverError::InvalidGeohash(_)));
    }
}
