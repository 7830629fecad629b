//! Create Hold Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use flashsale_app::domain::holds::{data::NewHold, records::HoldRecord};

use crate::{extensions::*, holds::errors::into_status_error, state::State};

/// Create Hold Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateHoldRequest {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

/// Hold Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HoldCreatedResponse {
    pub data: HoldCreatedData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HoldCreatedData {
    /// Created hold identifier
    pub hold_id: i64,

    /// When the reservation lapses, as an ISO-8601 instant
    pub expires_at: String,
}

impl From<HoldRecord> for HoldCreatedResponse {
    fn from(hold: HoldRecord) -> Self {
        HoldCreatedResponse {
            data: HoldCreatedData {
                hold_id: hold.id.into_i64(),
                expires_at: hold.expires_at.to_string(),
            },
        }
    }
}

fn validate(request: CreateHoldRequest) -> Result<NewHold, StatusError> {
    let product_id = request
        .product_id
        .ok_or_else(|| StatusError::unprocessable_entity().brief("product_id is required"))?;

    if product_id < 1 {
        return Err(StatusError::unprocessable_entity().brief("product_id must be a positive integer"));
    }

    let quantity = request
        .quantity
        .ok_or_else(|| StatusError::unprocessable_entity().brief("quantity is required"))?;

    if quantity < 1 {
        return Err(StatusError::unprocessable_entity().brief("quantity must be at least 1"));
    }

    Ok(NewHold {
        product_id: product_id.into(),
        quantity,
    })
}

/// Create Hold Handler
///
/// Reserves stock behind a time-bounded hold.
#[endpoint(
    tags("holds"),
    summary = "Create Hold",
    responses(
        (status_code = StatusCode::CREATED, description = "Hold created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Product missing or insufficient stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid request body"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateHoldRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HoldCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let hold = validate(json.into_inner())?;

    let created = state
        .app
        .holds
        .create_hold(hold)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}
