//! Order Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::{
    domain::{holds::records::HoldId, products::records::ProductId},
    ids::TypedId,
};

/// Order ID
pub type OrderId = TypedId<OrderRecord>;

/// Order lifecycle status. `paid` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Order Record
///
/// The immutable result of converting a hold before expiry. `total_price`
/// is in minor units. The `hold_id` column is UNIQUE in the store, which is
/// the structural guarantee that one hold produces at most one order.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: OrderId,
    pub hold_id: HoldId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub total_price: i64,
    pub status: OrderStatus,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
