//! Hold Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;

use crate::{domain::products::records::ProductId, ids::TypedId};

/// Hold ID
pub type HoldId = TypedId<HoldRecord>;

/// Hold lifecycle status. `used` and `expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStatus {
    Active,
    Used,
    Expired,
}

impl HoldStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "used" => Some(Self::Used),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl Display for HoldStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Hold Record
///
/// A time-bounded reservation of `quantity` units of a product. The units
/// are already debited from the product's stock while the hold is `active`.
#[derive(Debug, Clone)]
pub struct HoldRecord {
    pub id: HoldId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub status: HoldStatus,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
