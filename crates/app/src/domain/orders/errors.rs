//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::holds::records::HoldStatus;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("hold not found")]
    HoldNotFound,

    #[error("hold is {0} and cannot be used")]
    HoldNotActive(HoldStatus),

    #[error("hold has expired")]
    HoldExpired,

    #[error("hold has already been used for an order")]
    HoldAlreadyUsed,

    #[error("total price overflows")]
    PriceOverflow,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::HoldNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            // The UNIQUE constraint on orders.hold_id is the authoritative
            // defence against two conversions racing past the pre-checks.
            Some(ErrorKind::UniqueViolation) => Self::HoldAlreadyUsed,
            _ => Self::Sql(error),
        }
    }
}
