//! Product Records

use jiff::Timestamp;

use crate::ids::TypedId;

/// Product ID
pub type ProductId = TypedId<ProductRecord>;

/// Product Record
///
/// `price` is in minor units (cents); `stock` is the number of units
/// currently on the shelf, excluding anything reserved by active holds or
/// unsettled orders.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i64,
    pub created_at: Timestamp,
}
