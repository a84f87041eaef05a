// Copyright 2025 Cowboy AI, LLC.

//! Error types for field construction, evaluation and persistence

use thiserror::Error;

/// Errors that can occur while building, evaluating or persisting fields
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// No constituent field is valid at the queried point
    #[error("No constituent field contributes at this point ({x}, {y})")]
    MissingContribution {
        /// X coordinate of the queried point in the coadd frame
        x: f64,
        /// Y coordinate of the queried point in the coadd frame
        y: f64,
    },

    /// A field could not be constructed from the supplied parts
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),

    /// An archive is missing records, or holds records of the wrong kind
    #[error("Persistence format error: {0}")]
    PersistenceFormat(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for field operations
pub type FieldResult<T> = Result<T, FieldError>;

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Serialization(err.to_string())
    }
}

impl FieldError {
    /// Create a persistence format error
    pub fn persistence(msg: impl Into<String>) -> Self {
        FieldError::PersistenceFormat(msg.into())
    }

    /// Create an invalid construction error
    pub fn invalid(msg: impl Into<String>) -> Self {
        FieldError::InvalidConstruction(msg.into())
    }

    /// Check if this error reports a point with no contributing field
    pub fn is_missing_contribution(&self) -> bool {
        matches!(self, FieldError::MissingContribution { .. })
    }

    /// Check if this error was raised while reading or writing an archive
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            FieldError::PersistenceFormat(_) | FieldError::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = FieldError::MissingContribution { x: 1.5, y: -2.0 };
        assert_eq!(
            err.to_string(),
            "No constituent field contributes at this point (1.5, -2)"
        );

        let err = FieldError::invalid("weight is NaN");
        assert_eq!(err.to_string(), "Invalid construction: weight is NaN");

        let err = FieldError::persistence("id 7 not found");
        assert_eq!(err.to_string(), "Persistence format error: id 7 not found");

        let err = FieldError::Serialization("bad json".to_string());
        assert_eq!(err.to_string(), "Serialization error: bad json");
    }

    #[test]
    fn test_helper_method_exclusivity() {
        let missing = FieldError::MissingContribution { x: 0.0, y: 0.0 };
        assert!(missing.is_missing_contribution());
        assert!(!missing.is_persistence_error());

        let format = FieldError::persistence("wrong kind");
        assert!(!format.is_missing_contribution());
        assert!(format.is_persistence_error());

        let invalid = FieldError::invalid("nope");
        assert!(!invalid.is_missing_contribution());
        assert!(!invalid.is_persistence_error());
    }

    #[test]
    fn test_serde_json_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let err: FieldError = serde_err.into();

        match err {
            FieldError::Serialization(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Serialization, got {other:?}"),
        }
    }
}
