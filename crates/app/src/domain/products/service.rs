//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    cache::ProductCache,
    database::Db,
    domain::products::{
        data::NewProduct,
        errors::ProductsServiceError,
        records::{ProductId, ProductRecord},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    cache: ProductCache,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db, cache: ProductCache) -> Self {
        Self {
            db,
            cache,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn get_product(&self, id: ProductId) -> Result<ProductRecord, ProductsServiceError> {
        if let Some(product) = self.cache.get(id) {
            return Ok(product);
        }

        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, id).await?;

        tx.commit().await?;

        self.cache.set(product.clone());

        Ok(product)
    }

    async fn seed_product(&self, product: NewProduct) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a single product, served from the cache when fresh.
    async fn get_product(&self, id: ProductId) -> Result<ProductRecord, ProductsServiceError>;

    /// Create a product with its opening stock.
    async fn seed_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::query;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn seed_product_returns_created_product() {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .seed_product(NewProduct {
                name: "Widget".to_string(),
                description: "A widget".to_string(),
                price: 9999,
                stock: 100,
            })
            .await
            .expect("seed_product should succeed");

        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9999);
        assert_eq!(product.stock, 100);
    }

    #[tokio::test]
    async fn get_product_returns_seeded_product() {
        let ctx = TestContext::new().await;
        let seeded = ctx.seed_product("Widget", 9999, 100).await;

        let product = ctx
            .products
            .get_product(seeded.id)
            .await
            .expect("get_product should succeed");

        assert_eq!(product.id, seeded.id);
        assert_eq!(product.stock, 100);
    }

    #[tokio::test]
    async fn get_product_unknown_id_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductId::from_i64(4242)).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_product_serves_stale_reads_until_invalidated() {
        let ctx = TestContext::new().await;
        let seeded = ctx.seed_product("Widget", 9999, 100).await;

        // Prime the cache.
        ctx.products
            .get_product(seeded.id)
            .await
            .expect("get_product should succeed");

        // Mutate stock behind the cache's back.
        query("UPDATE products SET stock = 7 WHERE id = $1")
            .bind(seeded.id.into_i64())
            .execute(ctx.db.pool())
            .await
            .expect("stock update should succeed");

        let cached = ctx
            .products
            .get_product(seeded.id)
            .await
            .expect("get_product should succeed");

        assert_eq!(cached.stock, 100, "cached read may be stale");

        ctx.cache.forget(seeded.id);

        let fresh = ctx
            .products
            .get_product(seeded.id)
            .await
            .expect("get_product should succeed");

        assert_eq!(fresh.stock, 7, "invalidation must expose the new stock");
    }
}
