//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use flashsale_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData
        | ProductsServiceError::Sql(_) => {
            error!("product lookup failed: {error}");

            StatusError::internal_server_error()
        }
    }
}
