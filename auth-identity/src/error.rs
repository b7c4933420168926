use error_common::{log_error, FoodLogError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailAlreadyInUse,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Hashing error")]
    HashingError,

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

impl From<IdentityError> for FoodLogError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => FoodLogError::unauthenticated("Invalid credentials"),
            IdentityError::InvalidToken => FoodLogError::unauthenticated("Invalid token"),
            IdentityError::EmailAlreadyInUse => FoodLogError::conflict("Email already exists"),
            IdentityError::MissingField(field) => {
                FoodLogError::validation(field, format!("{field} is required"))
            }
            weak @ IdentityError::WeakPassword { .. } => {
                FoodLogError::validation("password", weak.to_string())
            }
            other => {
                let err = FoodLogError::internal("identity failure");
                log_error(&format!("identity: {other}"), &err);
                err
            }
        }
    }
}
