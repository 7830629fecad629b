//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use flashsale_app::{domain::products::records::ProductRecord, money::format_minor};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub data: ProductData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductData {
    /// The product identifier
    pub id: i64,

    /// The product display name
    pub name: String,

    /// The product description
    pub description: String,

    /// The unit price as a decimal string with two fractional digits
    pub price: String,

    /// Units currently on the shelf
    pub available_stock: i64,

    /// Whether any units are on the shelf
    pub in_stock: bool,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            data: ProductData {
                id: product.id.into_i64(),
                name: product.name,
                description: product.description,
                price: format_minor(product.price),
                available_stock: product.stock,
                in_stock: product.stock > 0,
            },
        }
    }
}

/// Get Product Handler
///
/// Returns a product. Reads may be served from the product cache, so the
/// reported stock can trail the store slightly.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product details"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use flashsale_app::domain::products::{MockProductsService, ProductsServiceError};

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products/{product}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_product_json() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(|id| id.into_i64() == 1)
            .return_once(|_| Ok(make_product(1, 9999, 5)));

        products.expect_seed_product().never();

        let mut res = TestClient::get("http://example.com/products/1")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(body.data.id, 1);
        assert_eq!(body.data.price, "99.99");
        assert_eq!(body.data.available_stock, 5);
        assert!(body.data.in_stock);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_sold_out_product_reports_out_of_stock() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Ok(make_product(1, 9999, 0)));

        let mut res = TestClient::get("http://example.com/products/1")
            .send(&make_service(products))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(body.data.available_stock, 0);
        assert!(!body.data.in_stock);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::get("http://example.com/products/1")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
