//! Holds service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoldsServiceError {
    #[error("product not found")]
    ProductNotFound,

    #[error("insufficient stock, {available} available")]
    InsufficientStock { available: i64 },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for HoldsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::ProductNotFound;
        }

        Self::Sql(error)
    }
}
