//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::warn;

use crate::{
    database::{Db, TX_RETRY_LIMIT, is_retryable},
    domain::{
        holds::{
            records::{HoldId, HoldStatus},
            repository::PgHoldsRepository,
        },
        orders::{
            errors::OrdersServiceError,
            records::{OrderRecord, OrderStatus},
            repository::PgOrdersRepository,
        },
        products::repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    holds_repository: PgHoldsRepository,
    products_repository: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            holds_repository: PgHoldsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn try_create_order_from_hold(
        &self,
        hold_id: HoldId,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let hold = self.holds_repository.lock_hold(&mut tx, hold_id).await?;

        if hold.status != HoldStatus::Active {
            return Err(OrdersServiceError::HoldNotActive(hold.status));
        }

        // The sweeper may not have caught a stale hold yet; an expiry that
        // has passed disqualifies the hold even while nominally active.
        if hold.expires_at <= Timestamp::now() {
            return Err(OrdersServiceError::HoldExpired);
        }

        let product = self
            .products_repository
            .get_product(&mut tx, hold.product_id)
            .await
            .map_err(OrdersServiceError::Sql)?;

        let total_price = product
            .price
            .checked_mul(hold.quantity)
            .ok_or(OrdersServiceError::PriceOverflow)?;

        let order = self
            .orders_repository
            .create_order(&mut tx, hold.id, hold.product_id, hold.quantity, total_price)
            .await?;

        self.holds_repository
            .set_status(&mut tx, hold.id, HoldStatus::Used)
            .await?;

        // Stock does not move here: the units were debited at hold time and
        // stay debited while the order is pending.
        tx.commit().await?;

        Ok(order)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order_from_hold(
        &self,
        hold_id: HoldId,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.try_create_order_from_hold(hold_id).await {
                Err(OrdersServiceError::Sql(error))
                    if is_retryable(&error) && attempts < TX_RETRY_LIMIT =>
                {
                    warn!("retrying order creation after transient conflict: {error}");
                }
                result => return result,
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert a still-valid hold into a pending order and retire the hold.
    async fn create_order_from_hold(
        &self,
        hold_id: HoldId,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

/// Cancel a pending order inside the caller's transaction: lock the product
/// row, return the order's units to stock, and mark the order cancelled.
/// Any other order status is a no-op returning `false`. The linked hold
/// stays `used`.
pub(crate) async fn cancel_pending_order(
    tx: &mut Transaction<'_, Postgres>,
    products: &PgProductsRepository,
    orders: &PgOrdersRepository,
    order: &OrderRecord,
) -> Result<bool, sqlx::Error> {
    if order.status != OrderStatus::Pending {
        return Ok(false);
    }

    products.lock_product(tx, order.product_id).await?;

    let updated = orders.mark_cancelled(tx, order.id).await?;

    if updated == 0 {
        return Ok(false);
    }

    products
        .adjust_stock(tx, order.product_id, order.quantity)
        .await?;

    Ok(true)
}
