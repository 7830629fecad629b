//! Create Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use flashsale_app::{
    domain::{holds::records::HoldId, orders::records::OrderRecord},
    money::format_minor,
};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub hold_id: Option<i64>,
}

/// Order Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderCreatedResponse {
    pub data: OrderCreatedData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderCreatedData {
    /// Created order identifier
    pub order_id: i64,

    /// The ordered product
    pub product_id: i64,

    /// Units ordered
    pub quantity: i64,

    /// Total price as a decimal string with two fractional digits
    pub total_price: String,

    /// Order status; always `pending` on creation
    pub status: String,

    /// Creation time as an ISO-8601 instant
    pub created_at: String,
}

impl From<OrderRecord> for OrderCreatedResponse {
    fn from(order: OrderRecord) -> Self {
        OrderCreatedResponse {
            data: OrderCreatedData {
                order_id: order.id.into_i64(),
                product_id: order.product_id.into_i64(),
                quantity: order.quantity,
                total_price: format_minor(order.total_price),
                status: order.status.to_string(),
                created_at: order.created_at.to_string(),
            },
        }
    }
}

fn validate(request: CreateOrderRequest) -> Result<HoldId, StatusError> {
    let hold_id = request
        .hold_id
        .ok_or_else(|| StatusError::unprocessable_entity().brief("hold_id is required"))?;

    if hold_id < 1 {
        return Err(StatusError::unprocessable_entity().brief("hold_id must be a positive integer"));
    }

    Ok(hold_id.into())
}

/// Create Order Handler
///
/// Converts a still-valid hold into a pending order.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Hold missing, expired, or already used"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid request body"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let hold_id = validate(json.into_inner())?;

    let order = state
        .app
        .orders
        .create_order_from_hold(hold_id)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
