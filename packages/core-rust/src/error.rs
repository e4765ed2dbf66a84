//! Error taxonomy for query translation and document validation.

/// Malformed caller input: an unparsable number or date, an unknown
/// comparison operator, or a document that violates the placement schema.
///
/// Raised immediately by the offending builder call, never deferred to
/// query execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for `{field}`: {message}")]
pub struct ValidationError {
    /// Name of the parameter or document field that failed validation.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for the given field.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by the terminal query operations.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The data-query interface failed. Propagated unchanged, never retried.
    #[error("upstream query failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_names_field() {
        let err = ValidationError::new("startDate", "`tomorrow` is not a calendar date");
        assert_eq!(
            err.to_string(),
            "invalid value for `startDate`: `tomorrow` is not a calendar date"
        );
    }

    #[test]
    fn query_error_wraps_upstream() {
        let err = QueryError::from(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, QueryError::Upstream(_)));
        assert_eq!(err.to_string(), "upstream query failed: connection reset");
    }

    #[test]
    fn query_error_validation_is_transparent() {
        let err = QueryError::from(ValidationError::new("limit", "bad"));
        assert_eq!(err.to_string(), "invalid value for `limit`: bad");
    }
}
