use database_layer::DatabaseError;
use error_common::FoodLogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OwnershipError {
    /// The ownership chain could not be resolved
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

pub type Result<T> = std::result::Result<T, OwnershipError>;

impl From<OwnershipError> for FoodLogError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::Store(e) => e.into(),
        }
    }
}
