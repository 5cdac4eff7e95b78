/// Errors surfaced by store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error from the Postgres backend.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule was violated (e.g. email already registered).
    #[error("Duplicate value: {0}")]
    Duplicate(String),
}

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

impl StoreError {
    /// Map a unique-constraint violation to [`StoreError::Duplicate`],
    /// passing every other error through.
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::Duplicate(constraint);
            }
        }
        StoreError::Database(err)
    }
}
