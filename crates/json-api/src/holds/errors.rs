//! Hold Errors

use salvo::http::StatusError;
use tracing::error;

use flashsale_app::domain::holds::HoldsServiceError;

pub(crate) fn into_status_error(error: HoldsServiceError) -> StatusError {
    match error {
        HoldsServiceError::ProductNotFound => {
            StatusError::bad_request().brief("Product not found")
        }
        HoldsServiceError::InsufficientStock { available } => StatusError::bad_request()
            .brief(format!("Insufficient stock. Available: {available}")),
        HoldsServiceError::Sql(source) => {
            error!("failed to create hold: {source}");

            StatusError::internal_server_error()
        }
    }
}
