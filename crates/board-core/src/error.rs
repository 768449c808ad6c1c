//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: i32) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    pub fn user_not_found(id: i32) -> Self {
        Self::NotFound {
            entity_type: "User",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A write referenced a row that does not exist, e.g. an unknown file id.
    #[error("Unknown reference: {0}")]
    InvalidReference(String),
}

/// Store failures surface as `Internal` except for the kinds the caller can act on.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::InvalidReference(msg) => DomainError::Validation(msg),
            RepoError::NotFound => DomainError::Internal("Row vanished during write".to_string()),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_insert_race_is_a_conflict() {
        let err = DomainError::from(RepoError::Constraint("ux_votes_post_user".into()));
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "ux_votes_post_user"));
    }

    #[test]
    fn unknown_reference_is_a_validation_error() {
        let err = DomainError::from(RepoError::InvalidReference("file 9".into()));
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn store_failures_are_internal() {
        for err in [
            RepoError::Connection("refused".into()),
            RepoError::Query("syntax".into()),
            RepoError::NotFound,
        ] {
            assert!(matches!(DomainError::from(err), DomainError::Internal(_)));
        }
    }
}
