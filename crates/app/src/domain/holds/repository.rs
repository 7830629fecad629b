//! Holds Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    holds::{
        data::NewHold,
        records::{HoldId, HoldRecord, HoldStatus},
    },
    products::records::ProductId,
};

const CREATE_HOLD_SQL: &str = include_str!("sql/create_hold.sql");
const LOCK_HOLD_SQL: &str = include_str!("sql/lock_hold.sql");
const SET_HOLD_STATUS_SQL: &str = include_str!("sql/set_hold_status.sql");
const FIND_EXPIRED_HOLDS_SQL: &str = include_str!("sql/find_expired_holds.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgHoldsRepository;

impl PgHoldsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_hold(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        hold: NewHold,
        expires_at: Timestamp,
    ) -> Result<HoldRecord, sqlx::Error> {
        query_as::<Postgres, HoldRecord>(CREATE_HOLD_SQL)
            .bind(hold.product_id.into_i64())
            .bind(hold.quantity)
            .bind(SqlxTimestamp::from(expires_at))
            .fetch_one(&mut **tx)
            .await
    }

    /// Read the hold row under an exclusive row lock. Conversion and
    /// release serialise here.
    pub(crate) async fn lock_hold(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        hold: HoldId,
    ) -> Result<HoldRecord, sqlx::Error> {
        query_as::<Postgres, HoldRecord>(LOCK_HOLD_SQL)
            .bind(hold.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        hold: HoldId,
        status: HoldStatus,
    ) -> Result<(), sqlx::Error> {
        query(SET_HOLD_STATUS_SQL)
            .bind(hold.into_i64())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Active holds whose expiry has passed, without taking any locks.
    pub(crate) async fn find_expired(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<Vec<HoldRecord>, sqlx::Error> {
        query_as::<Postgres, HoldRecord>(FIND_EXPIRED_HOLDS_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for HoldRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = HoldStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown hold status {status:?}").into(),
        })?;

        Ok(Self {
            id: HoldId::from_i64(row.try_get("id")?),
            product_id: ProductId::from_i64(row.try_get("product_id")?),
            quantity: row.try_get("quantity")?,
            status,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
