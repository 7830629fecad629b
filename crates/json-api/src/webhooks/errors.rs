//! Webhook Errors

use salvo::http::StatusError;
use tracing::error;

use flashsale_app::domain::webhooks::WebhooksServiceError;

pub(crate) fn into_status_error(error: WebhooksServiceError) -> StatusError {
    let WebhooksServiceError::Sql(source) = error;

    // An internal failure must surface as 500 so the provider retries:
    // the transaction rolled back, including the log row.
    error!("failed to process webhook: {source}");

    StatusError::internal_server_error()
}
