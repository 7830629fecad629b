//! Webhooks service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhooksServiceError {
    #[error("storage error")]
    Sql(#[from] Error),
}
