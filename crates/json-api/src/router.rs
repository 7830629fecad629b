//! App Router

use salvo::Router;

use crate::{holds, orders, products, webhooks};

pub fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(Router::with_path("holds").post(holds::create::handler))
        .push(Router::with_path("orders").post(orders::create::handler))
        .push(
            Router::with_path("payments")
                .push(Router::with_path("webhook").post(webhooks::process::handler)),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{prelude::*, test::TestClient};

    use flashsale_app::domain::{
        holds::MockHoldsService, orders::MockOrdersService, products::MockProductsService,
        webhooks::MockWebhooksService,
    };

    use crate::test_helpers::service_with_mocks;

    use super::app_router;

    fn router_service(
        products: MockProductsService,
        holds: MockHoldsService,
        orders: MockOrdersService,
        webhooks: MockWebhooksService,
    ) -> Service {
        service_with_mocks(products, holds, orders, webhooks, app_router())
    }

    #[tokio::test]
    async fn test_get_product_is_registered() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .return_once(|_| Err(flashsale_app::domain::products::ProductsServiceError::NotFound));

        let service = router_service(
            products,
            MockHoldsService::new(),
            MockOrdersService::new(),
            MockWebhooksService::new(),
        );

        let res = TestClient::get("http://example.com/products/1")
            .send(&service)
            .await;

        assert_eq!(
            res.status_code,
            Some(StatusCode::NOT_FOUND),
            "GET /products/{{product}} should reach the handler"
        );
    }

    #[tokio::test]
    async fn test_post_holds_is_registered() {
        let service = router_service(
            MockProductsService::new(),
            MockHoldsService::new(),
            MockOrdersService::new(),
            MockWebhooksService::new(),
        );

        let res = TestClient::post("http://example.com/holds")
            .send(&service)
            .await;

        assert_ne!(
            res.status_code,
            Some(StatusCode::NOT_FOUND),
            "POST /holds should be registered"
        );
    }

    #[tokio::test]
    async fn test_post_orders_is_registered() {
        let service = router_service(
            MockProductsService::new(),
            MockHoldsService::new(),
            MockOrdersService::new(),
            MockWebhooksService::new(),
        );

        let res = TestClient::post("http://example.com/orders")
            .send(&service)
            .await;

        assert_ne!(
            res.status_code,
            Some(StatusCode::NOT_FOUND),
            "POST /orders should be registered"
        );
    }

    #[tokio::test]
    async fn test_post_payments_webhook_is_registered() {
        let service = router_service(
            MockProductsService::new(),
            MockHoldsService::new(),
            MockOrdersService::new(),
            MockWebhooksService::new(),
        );

        let res = TestClient::post("http://example.com/payments/webhook")
            .send(&service)
            .await;

        assert_ne!(
            res.status_code,
            Some(StatusCode::NOT_FOUND),
            "POST /payments/webhook should be registered"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let service = router_service(
            MockProductsService::new(),
            MockHoldsService::new(),
            MockOrdersService::new(),
            MockWebhooksService::new(),
        );

        let res = TestClient::get("http://example.com/waitlists")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
