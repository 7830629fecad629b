//! Holds Data

use crate::domain::products::records::ProductId;

/// New Hold Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHold {
    pub product_id: ProductId,
    pub quantity: i64,
}
