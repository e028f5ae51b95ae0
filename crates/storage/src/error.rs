use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    /// A write broke a league rule: a taken username, an unknown fixture,
    /// fixtures locked by recorded results.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A transaction could not be committed. None of its writes are visible.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Integrity constraints of the schema that repositories report by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unique,
    ForeignKey,
}

impl Violation {
    fn sqlstate(self) -> &'static str {
        match self {
            Violation::Unique => "23505",
            Violation::ForeignKey => "23503",
        }
    }
}

impl StorageError {
    pub fn violates(&self, violation: Violation) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some(violation.sqlstate())
        )
    }

    /// Turns a violation of `violation` into a readable
    /// [`StorageError::ConstraintViolation`]; anything else passes through.
    pub fn explain(self, violation: Violation, message: impl FnOnce() -> String) -> Self {
        if self.violates(violation) {
            StorageError::ConstraintViolation(message())
        } else {
            self
        }
    }

    /// Scores and predictions may only reference fixtures of their own week.
    pub fn unknown_fixture(self, week: i32, fixture_id: &str) -> Self {
        self.explain(Violation::ForeignKey, || {
            format!("Fixture '{}' is not part of week {}", fixture_id, week)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let error = StorageError::NotFound.unknown_fixture(1, "A vs B");
        assert!(matches!(error, StorageError::NotFound));

        let error = StorageError::Database(sqlx::Error::RowNotFound)
            .explain(Violation::Unique, || "taken".to_string());
        assert!(matches!(error, StorageError::Database(_)));
    }

    #[test]
    fn test_violates_requires_database_error() {
        assert!(!StorageError::ConstraintViolation("x".into()).violates(Violation::Unique));
        assert!(!StorageError::Persistence("x".into()).violates(Violation::ForeignKey));
    }
}
