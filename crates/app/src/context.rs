//! App Context

use std::{sync::Arc, time::Duration};

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    cache::ProductCache,
    database::{self, Db},
    domain::{
        holds::{HoldsService, PgHoldsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        webhooks::{PgWebhooksService, WebhooksService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Tunables for the checkout core.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    /// How long a hold keeps stock off the shelf before the sweeper may
    /// reclaim it.
    pub hold_ttl: SignedDuration,

    /// How long a cached product read stays fresh.
    pub product_cache_ttl: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            hold_ttl: SignedDuration::from_secs(120),
            product_cache_ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub holds: Arc<dyn HoldsService>,
    pub orders: Arc<dyn OrdersService>,
    pub webhooks: Arc<dyn WebhooksService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        settings: AppSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);
        let cache = ProductCache::new(settings.product_cache_ttl);

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone(), cache.clone())),
            holds: Arc::new(PgHoldsService::new(
                db.clone(),
                cache.clone(),
                settings.hold_ttl,
            )),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            webhooks: Arc::new(PgWebhooksService::new(db, cache)),
        })
    }
}
