//! Webhook Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::{domain::orders::records::OrderId, ids::TypedId};

/// Webhook Log ID
pub type WebhookLogId = TypedId<WebhookLogRecord>;

/// Payment outcome reported by the provider. Also the status stored on a
/// webhook log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Failure,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Webhook Log Record
///
/// One row per logical delivery; the UNIQUE `idempotency_key` is the
/// idempotency primitive. Rows are never mutated after the processing
/// transaction commits, and never deleted. `order_id` is NULL when the
/// delivery arrived before its order existed.
#[derive(Debug, Clone)]
pub struct WebhookLogRecord {
    pub id: WebhookLogId,
    pub idempotency_key: String,
    pub order_id: Option<OrderId>,
    pub status: PaymentStatus,
    pub payload: serde_json::Value,
    pub processed_at: Timestamp,
}
