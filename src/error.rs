//! Error types for rs-pricing-cms.
//!
//! Most failures in the pipeline are recovered close to where they happen
//! (fallback strategy, empty section, empty exclusion config). The variants
//! here are what those recovery points match on.

use std::path::PathBuf;

use crate::strategy::StrategyType;

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input HTML file is missing or unreadable.
    #[error("input not found: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An exclusion or product configuration failed to parse or normalize.
    #[error("malformed configuration: {0}")]
    ConfigMalformed(String),

    /// Page classification could not be completed.
    #[error("page classification failed: {0}")]
    ClassificationFailed(String),

    /// A single section or metadata extractor failed.
    #[error("section extraction failed ({section}): {message}")]
    SectionExtractionFailed { section: String, message: String },

    /// No constructor is registered for the requested strategy type.
    #[error("no strategy registered for {0}")]
    StrategyNotRegistered(StrategyType),

    /// JSON (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_mentions_path() {
        let err = Error::InputNotFound {
            path: PathBuf::from("/tmp/missing-index.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing-index.html"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn strategy_not_registered_names_type() {
        let err = Error::StrategyNotRegistered(StrategyType::LargeFile);
        assert_eq!(err.to_string(), "no strategy registered for large_file");
    }
}
