//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use flashsale_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::HoldNotFound => StatusError::bad_request().brief("Hold not found"),
        OrdersServiceError::HoldNotActive(status) => {
            StatusError::bad_request().brief(format!("Hold is {status} and cannot be used"))
        }
        OrdersServiceError::HoldExpired => StatusError::bad_request().brief("Hold has expired"),
        OrdersServiceError::HoldAlreadyUsed => {
            StatusError::bad_request().brief("Hold has already been used for an order")
        }
        OrdersServiceError::PriceOverflow | OrdersServiceError::Sql(_) => {
            error!("failed to create order: {error}");

            StatusError::internal_server_error()
        }
    }
}
