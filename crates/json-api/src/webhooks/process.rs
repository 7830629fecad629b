//! Process Webhook Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use flashsale_app::domain::webhooks::{WebhookOutcome, records::PaymentStatus};

use crate::{extensions::*, state::State, webhooks::errors::into_status_error};

const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// Webhook Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// Outcome description
    pub message: String,

    /// Whether this key had already been processed
    pub already_processed: bool,
}

struct WebhookRequest {
    idempotency_key: String,
    order_id: i64,
    payment_status: PaymentStatus,
}

/// The whole body is kept as the opaque payload; the fields the processor
/// needs are validated here, before anything reaches the core.
fn validate(payload: &Value) -> Result<WebhookRequest, StatusError> {
    let idempotency_key = payload
        .get("idempotency_key")
        .and_then(Value::as_str)
        .ok_or_else(|| StatusError::unprocessable_entity().brief("idempotency_key is required"))?;

    if idempotency_key.is_empty() || idempotency_key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(StatusError::unprocessable_entity()
            .brief("idempotency_key must be between 1 and 255 characters"));
    }

    let order_id = payload
        .get("order_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| StatusError::unprocessable_entity().brief("order_id is required"))?;

    let payment_status = payload
        .get("payment_status")
        .and_then(Value::as_str)
        .ok_or_else(|| StatusError::unprocessable_entity().brief("payment_status is required"))?;

    let payment_status = PaymentStatus::parse(payment_status).ok_or_else(|| {
        StatusError::unprocessable_entity()
            .brief("payment_status must be \"success\" or \"failure\"")
    })?;

    Ok(WebhookRequest {
        idempotency_key: idempotency_key.to_string(),
        order_id,
        payment_status,
    })
}

/// Process Webhook Handler
///
/// Idempotently settles or cancels an order from a payment outcome.
/// Replays of a processed key return 200 with `already_processed` set.
#[endpoint(
    tags("payments"),
    summary = "Process Payment Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Webhook processed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid request body"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let payload: Value = req
        .parse_json()
        .await
        .map_err(|_| StatusError::unprocessable_entity().brief("request body must be a JSON object"))?;

    let request = validate(&payload)?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = state
        .app
        .webhooks
        .process_webhook(
            request.idempotency_key,
            request.order_id.into(),
            request.payment_status,
            payload,
        )
        .await
        .map_err(into_status_error)?;

    match outcome {
        WebhookOutcome::AlreadyProcessed => Ok(Json(WebhookResponse {
            message: "Webhook already processed".to_string(),
            already_processed: true,
        })),
        WebhookOutcome::MarkedPaid => Ok(Json(WebhookResponse {
            message: "Payment successful, order marked as paid".to_string(),
            already_processed: false,
        })),
        WebhookOutcome::CancelledAndRestocked => Ok(Json(WebhookResponse {
            message: "Payment failed, order cancelled and stock returned".to_string(),
            already_processed: false,
        })),
        WebhookOutcome::OrderAlreadySettled => Ok(Json(WebhookResponse {
            message: "Order already settled, no changes applied".to_string(),
            already_processed: false,
        })),
        WebhookOutcome::OrderNotFound => Err(StatusError::bad_request()
            .brief("Order not found - webhook may have arrived early")),
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use flashsale_app::domain::webhooks::MockWebhooksService;

    use crate::test_helpers::webhooks_service;

    use super::*;

    fn make_service(webhooks: MockWebhooksService) -> Service {
        webhooks_service(webhooks, Router::with_path("payments/webhook").post(handler))
    }

    #[tokio::test]
    async fn test_success_webhook_returns_paid_message() -> TestResult {
        let mut webhooks = MockWebhooksService::new();

        webhooks
            .expect_process_webhook()
            .once()
            .withf(|key, order_id, status, payload| {
                key.as_str() == "k1"
                    && order_id.into_i64() == 11
                    && *status == PaymentStatus::Success
                    && payload.get("extra").is_some()
            })
            .return_once(|_, _, _, _| Ok(WebhookOutcome::MarkedPaid));

        let mut res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k1",
                "order_id": 11,
                "payment_status": "success",
                "extra": {"provider": "acme"},
            }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(body.message, "Payment successful, order marked as paid");
        assert!(!body.already_processed);

        Ok(())
    }

    #[tokio::test]
    async fn test_failure_webhook_returns_cancelled_message() -> TestResult {
        let mut webhooks = MockWebhooksService::new();

        webhooks
            .expect_process_webhook()
            .once()
            .withf(|_, _, status, _| *status == PaymentStatus::Failure)
            .return_once(|_, _, _, _| Ok(WebhookOutcome::CancelledAndRestocked));

        let mut res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k1",
                "order_id": 11,
                "payment_status": "failure",
            }))
            .send(&make_service(webhooks))
            .await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(body.message, "Payment failed, order cancelled and stock returned");
        assert!(!body.already_processed);

        Ok(())
    }

    #[tokio::test]
    async fn test_settled_order_reports_no_changes() -> TestResult {
        let mut webhooks = MockWebhooksService::new();

        webhooks
            .expect_process_webhook()
            .once()
            .return_once(|_, _, _, _| Ok(WebhookOutcome::OrderAlreadySettled));

        let mut res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k2",
                "order_id": 11,
                "payment_status": "success",
            }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(body.message, "Order already settled, no changes applied");
        assert!(!body.already_processed);

        Ok(())
    }

    #[tokio::test]
    async fn test_replay_returns_already_processed() -> TestResult {
        let mut webhooks = MockWebhooksService::new();

        webhooks
            .expect_process_webhook()
            .once()
            .return_once(|_, _, _, _| Ok(WebhookOutcome::AlreadyProcessed));

        let mut res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k1",
                "order_id": 11,
                "payment_status": "success",
            }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(body.message, "Webhook already processed");
        assert!(body.already_processed);

        Ok(())
    }

    #[tokio::test]
    async fn test_early_arrival_returns_400() -> TestResult {
        let mut webhooks = MockWebhooksService::new();

        webhooks
            .expect_process_webhook()
            .once()
            .return_once(|_, _, _, _| Ok(WebhookOutcome::OrderNotFound));

        let mut res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k1",
                "order_id": 4242,
                "payment_status": "success",
            }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body = res.take_string().await?;

        assert!(
            body.contains("Order not found - webhook may have arrived early"),
            "body should carry the stable message, got {body}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_status_returns_422() -> TestResult {
        let mut webhooks = MockWebhooksService::new();
        webhooks.expect_process_webhook().never();

        let res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k1",
                "order_id": 11,
                "payment_status": "refunded",
            }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_idempotency_key_returns_422() -> TestResult {
        let mut webhooks = MockWebhooksService::new();
        webhooks.expect_process_webhook().never();

        let res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({ "order_id": 11, "payment_status": "success" }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_oversized_idempotency_key_returns_422() -> TestResult {
        let mut webhooks = MockWebhooksService::new();
        webhooks.expect_process_webhook().never();

        let res = TestClient::post("http://example.com/payments/webhook")
            .json(&json!({
                "idempotency_key": "k".repeat(256),
                "order_id": 11,
                "payment_status": "success",
            }))
            .send(&make_service(webhooks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
