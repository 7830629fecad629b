//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    holds::records::HoldId,
    orders::records::{OrderId, OrderRecord, OrderStatus},
    products::records::ProductId,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const MARK_ORDER_PAID_SQL: &str = include_str!("sql/mark_order_paid.sql");
const MARK_ORDER_CANCELLED_SQL: &str = include_str!("sql/mark_order_cancelled.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        hold: HoldId,
        product: ProductId,
        quantity: i64,
        total_price: i64,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(hold.into_i64())
            .bind(product.into_i64())
            .bind(quantity)
            .bind(total_price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Mark a pending order paid. Returns the number of rows updated, which
    /// is zero when the order was no longer pending.
    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        paid_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_ORDER_PAID_SQL)
            .bind(order.into_i64())
            .bind(SqlxTimestamp::from(paid_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Mark a pending order cancelled. Returns the number of rows updated,
    /// which is zero when the order was no longer pending.
    pub(crate) async fn mark_cancelled(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_ORDER_CANCELLED_SQL)
            .bind(order.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = OrderStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown order status {status:?}").into(),
        })?;

        Ok(Self {
            id: OrderId::from_i64(row.try_get("id")?),
            hold_id: HoldId::from_i64(row.try_get("hold_id")?),
            product_id: ProductId::from_i64(row.try_get("product_id")?),
            quantity: row.try_get("quantity")?,
            total_price: row.try_get("total_price")?,
            status,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
