//! Webhooks service.
//!
//! Settles orders against out-of-band payment outcomes. Correctness must
//! survive arbitrary retries, out-of-order arrival relative to order
//! creation, and interleaving between concurrent deliveries of one key.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;

use crate::{
    cache::ProductCache,
    database::{Db, TX_RETRY_LIMIT, is_retryable, is_unique_violation},
    domain::{
        orders::{
            records::OrderId,
            repository::PgOrdersRepository,
            service::cancel_pending_order,
        },
        products::repository::PgProductsRepository,
        webhooks::{
            errors::WebhooksServiceError,
            records::PaymentStatus,
            repository::PgWebhookLogsRepository,
        },
    },
};

/// Committed effect of a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A log row for this key already exists; the delivery had no effect.
    AlreadyProcessed,

    /// The payment succeeded and the order is paid.
    MarkedPaid,

    /// The payment failed; the order is cancelled and its units returned.
    CancelledAndRestocked,

    /// The order was already in a terminal state. The delivery is logged
    /// and the order left untouched.
    OrderAlreadySettled,

    /// The delivery arrived before its order. The log row is committed so
    /// retries of this key are suppressed; operators reconcile from the log.
    OrderNotFound,
}

#[derive(Debug, Clone)]
pub struct PgWebhooksService {
    db: Db,
    cache: ProductCache,
    logs_repository: PgWebhookLogsRepository,
    orders_repository: PgOrdersRepository,
    products_repository: PgProductsRepository,
}

impl PgWebhooksService {
    #[must_use]
    pub fn new(db: Db, cache: ProductCache) -> Self {
        Self {
            db,
            cache,
            logs_repository: PgWebhookLogsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn try_process_webhook(
        &self,
        idempotency_key: &str,
        order_id: OrderId,
        payment_status: PaymentStatus,
        payload: &serde_json::Value,
    ) -> Result<WebhookOutcome, WebhooksServiceError> {
        // Fast path: a committed log row makes the stored outcome
        // authoritative, whatever the incoming payload says.
        let mut tx = self.db.begin().await?;
        let existing = self
            .logs_repository
            .find_by_key(&mut tx, idempotency_key)
            .await?;
        tx.commit().await?;

        if existing.is_some() {
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        let now = Timestamp::now();
        let mut tx = self.db.begin().await?;

        // Two deliveries of one key can both miss the fast path; the UNIQUE
        // key closes that gap here.
        let log_id = match self
            .logs_repository
            .insert(&mut tx, idempotency_key, payment_status, payload, now)
            .await
        {
            Ok(log_id) => log_id,
            Err(error) if is_unique_violation(&error) => {
                return Ok(WebhookOutcome::AlreadyProcessed);
            }
            Err(error) => return Err(error.into()),
        };

        let Some(order) = self.orders_repository.lock_order(&mut tx, order_id).await? else {
            // Webhook arrived before its order. Commit the log with a NULL
            // order reference so retries of this key are suppressed; the
            // provider's retry would never find the order either.
            tx.commit().await?;

            return Ok(WebhookOutcome::OrderNotFound);
        };

        self.logs_repository
            .set_order(&mut tx, log_id, order.id)
            .await?;

        match payment_status {
            PaymentStatus::Success => {
                // Conditional on the order still being pending: terminal
                // states are never overwritten.
                let updated = self
                    .orders_repository
                    .mark_paid(&mut tx, order.id, now)
                    .await?;

                tx.commit().await?;

                if updated == 0 {
                    return Ok(WebhookOutcome::OrderAlreadySettled);
                }

                Ok(WebhookOutcome::MarkedPaid)
            }
            PaymentStatus::Failure => {
                let cancelled = cancel_pending_order(
                    &mut tx,
                    &self.products_repository,
                    &self.orders_repository,
                    &order,
                )
                .await?;

                tx.commit().await?;

                if !cancelled {
                    return Ok(WebhookOutcome::OrderAlreadySettled);
                }

                self.cache.forget(order.product_id);

                Ok(WebhookOutcome::CancelledAndRestocked)
            }
        }
    }
}

#[async_trait]
impl WebhooksService for PgWebhooksService {
    async fn process_webhook(
        &self,
        idempotency_key: String,
        order_id: OrderId,
        payment_status: PaymentStatus,
        payload: serde_json::Value,
    ) -> Result<WebhookOutcome, WebhooksServiceError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            // A transient abort rolls the log row back with everything
            // else, so the retry re-enters the full path.
            match self
                .try_process_webhook(&idempotency_key, order_id, payment_status, &payload)
                .await
            {
                Err(WebhooksServiceError::Sql(error))
                    if is_retryable(&error) && attempts < TX_RETRY_LIMIT =>
                {
                    warn!("retrying webhook processing after transient conflict: {error}");
                }
                result => return result,
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait WebhooksService: Send + Sync {
    /// Idempotently settle or cancel an order given a payment outcome.
    async fn process_webhook(
        &self,
        idempotency_key: String,
        order_id: OrderId,
        payment_status: PaymentStatus,
        payload: serde_json::Value,
    ) -> Result<WebhookOutcome, WebhooksServiceError>;
}
