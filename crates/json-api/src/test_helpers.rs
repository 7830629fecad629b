//! Test helpers.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use salvo::{affix_state::inject, prelude::*};

use flashsale_app::{
    context::AppContext,
    domain::{
        holds::{
            MockHoldsService,
            records::{HoldId, HoldRecord, HoldStatus},
        },
        orders::{
            MockOrdersService,
            records::{OrderId, OrderRecord, OrderStatus},
        },
        products::{
            MockProductsService,
            records::{ProductId, ProductRecord},
        },
        webhooks::MockWebhooksService,
    },
};

use crate::state::State;

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_get_product().never();
    products.expect_seed_product().never();

    products
}

fn strict_holds_mock() -> MockHoldsService {
    let mut holds = MockHoldsService::new();

    holds.expect_create_hold().never();
    holds.expect_release_expired_hold().never();
    holds.expect_find_expired_holds().never();

    holds
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order_from_hold().never();

    orders
}

fn strict_webhooks_mock() -> MockWebhooksService {
    let mut webhooks = MockWebhooksService::new();

    webhooks.expect_process_webhook().never();

    webhooks
}

fn make_state(
    products: MockProductsService,
    holds: MockHoldsService,
    orders: MockOrdersService,
    webhooks: MockWebhooksService,
) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(products),
        holds: Arc::new(holds),
        orders: Arc::new(orders),
        webhooks: Arc::new(webhooks),
    }))
}

pub(crate) fn service_with_mocks(
    products: MockProductsService,
    holds: MockHoldsService,
    orders: MockOrdersService,
    webhooks: MockWebhooksService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(make_state(products, holds, orders, webhooks)))
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    service_with_mocks(
        products,
        strict_holds_mock(),
        strict_orders_mock(),
        strict_webhooks_mock(),
        route,
    )
}

pub(crate) fn holds_service(holds: MockHoldsService, route: Router) -> Service {
    service_with_mocks(
        strict_products_mock(),
        holds,
        strict_orders_mock(),
        strict_webhooks_mock(),
        route,
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service_with_mocks(
        strict_products_mock(),
        strict_holds_mock(),
        orders,
        strict_webhooks_mock(),
        route,
    )
}

pub(crate) fn webhooks_service(webhooks: MockWebhooksService, route: Router) -> Service {
    service_with_mocks(
        strict_products_mock(),
        strict_holds_mock(),
        strict_orders_mock(),
        webhooks,
        route,
    )
}

pub(crate) fn make_product(id: i64, price: i64, stock: i64) -> ProductRecord {
    ProductRecord {
        id: ProductId::from_i64(id),
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price,
        stock,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_hold(id: i64, product_id: i64, quantity: i64) -> HoldRecord {
    HoldRecord {
        id: HoldId::from_i64(id),
        product_id: ProductId::from_i64(product_id),
        quantity,
        status: HoldStatus::Active,
        expires_at: Timestamp::UNIX_EPOCH + SignedDuration::from_secs(120),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(
    id: i64,
    hold_id: i64,
    product_id: i64,
    quantity: i64,
    total_price: i64,
) -> OrderRecord {
    OrderRecord {
        id: OrderId::from_i64(id),
        hold_id: HoldId::from_i64(hold_id),
        product_id: ProductId::from_i64(product_id),
        quantity,
        total_price,
        status: OrderStatus::Pending,
        paid_at: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
