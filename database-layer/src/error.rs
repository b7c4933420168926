use error_common::{log_error, FoodLogError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// An insert referenced a parent row that no longer exists
    #[error("{kind} {id} does not exist")]
    MissingParent { kind: &'static str, id: Uuid },

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationError(err.to_string())
    }
}

impl From<DatabaseError> for FoodLogError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::MissingParent { kind, .. } => FoodLogError::not_found(kind),
            // Storage details never leave the process
            other => {
                let err = FoodLogError::internal("storage failure");
                log_error(&format!("hierarchy store: {other}"), &err);
                err
            }
        }
    }
}
