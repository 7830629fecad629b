//! Holds service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::warn;

use crate::{
    cache::ProductCache,
    database::{Db, TX_RETRY_LIMIT, is_retryable},
    domain::{
        holds::{
            data::NewHold,
            errors::HoldsServiceError,
            records::{HoldRecord, HoldStatus},
            repository::PgHoldsRepository,
        },
        products::repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgHoldsService {
    db: Db,
    cache: ProductCache,
    hold_ttl: SignedDuration,
    holds_repository: PgHoldsRepository,
    products_repository: PgProductsRepository,
}

impl PgHoldsService {
    #[must_use]
    pub fn new(db: Db, cache: ProductCache, hold_ttl: SignedDuration) -> Self {
        Self {
            db,
            cache,
            hold_ttl,
            holds_repository: PgHoldsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn try_create_hold(&self, hold: NewHold) -> Result<HoldRecord, HoldsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .products_repository
            .lock_product(&mut tx, hold.product_id)
            .await?;

        if product.stock < hold.quantity {
            // Dropping the transaction rolls it back; no persistent change.
            return Err(HoldsServiceError::InsufficientStock {
                available: product.stock,
            });
        }

        self.products_repository
            .adjust_stock(&mut tx, hold.product_id, -hold.quantity)
            .await?;

        let expires_at = Timestamp::now() + self.hold_ttl;

        let created = self
            .holds_repository
            .create_hold(&mut tx, hold, expires_at)
            .await?;

        tx.commit().await?;

        self.cache.forget(hold.product_id);

        Ok(created)
    }
}

#[async_trait]
impl HoldsService for PgHoldsService {
    async fn create_hold(&self, hold: NewHold) -> Result<HoldRecord, HoldsServiceError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.try_create_hold(hold).await {
                Err(HoldsServiceError::Sql(error))
                    if is_retryable(&error) && attempts < TX_RETRY_LIMIT =>
                {
                    warn!("retrying hold creation after transient conflict: {error}");
                }
                result => return result,
            }
        }
    }

    async fn release_expired_hold(&self, hold: &HoldRecord) -> Result<bool, HoldsServiceError> {
        let mut tx = self.db.begin().await?;

        self.products_repository
            .lock_product(&mut tx, hold.product_id)
            .await?;

        // Re-read under lock: a concurrent conversion may have used the
        // hold between the sweep scan and this transaction.
        let current = match self.holds_repository.lock_hold(&mut tx, hold.id).await {
            Ok(current) => current,
            Err(sqlx::Error::RowNotFound) => return Ok(false),
            Err(error) => return Err(HoldsServiceError::Sql(error)),
        };

        if current.status != HoldStatus::Active {
            return Ok(false);
        }

        self.products_repository
            .adjust_stock(&mut tx, current.product_id, current.quantity)
            .await?;

        self.holds_repository
            .set_status(&mut tx, current.id, HoldStatus::Expired)
            .await?;

        tx.commit().await?;

        self.cache.forget(current.product_id);

        Ok(true)
    }

    async fn find_expired_holds(&self, now: Timestamp) -> Result<Vec<HoldRecord>, HoldsServiceError> {
        let mut tx = self.db.begin().await?;

        let holds = self.holds_repository.find_expired(&mut tx, now).await?;

        tx.commit().await?;

        Ok(holds)
    }
}

#[automock]
#[async_trait]
pub trait HoldsService: Send + Sync {
    /// Reserve `quantity` units of a product behind a time-bounded hold,
    /// debiting the product's stock in the same transaction.
    async fn create_hold(&self, hold: NewHold) -> Result<HoldRecord, HoldsServiceError>;

    /// Return a stale hold's units to stock and mark it `expired`. Returns
    /// `Ok(false)` without effect when the hold is no longer active.
    async fn release_expired_hold(&self, hold: &HoldRecord) -> Result<bool, HoldsServiceError>;

    /// Active holds whose `expires_at` is at or before `now`.
    async fn find_expired_holds(&self, now: Timestamp)
    -> Result<Vec<HoldRecord>, HoldsServiceError>;
}
