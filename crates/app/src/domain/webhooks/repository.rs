//! Webhook Logs Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};

use crate::domain::{
    orders::records::OrderId,
    webhooks::records::{PaymentStatus, WebhookLogId, WebhookLogRecord},
};

const FIND_WEBHOOK_LOG_SQL: &str = include_str!("sql/find_webhook_log.sql");
const INSERT_WEBHOOK_LOG_SQL: &str = include_str!("sql/insert_webhook_log.sql");
const SET_WEBHOOK_LOG_ORDER_SQL: &str = include_str!("sql/set_webhook_log_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWebhookLogsRepository;

impl PgWebhookLogsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_by_key(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        idempotency_key: &str,
    ) -> Result<Option<WebhookLogRecord>, sqlx::Error> {
        query_as::<Postgres, WebhookLogRecord>(FIND_WEBHOOK_LOG_SQL)
            .bind(idempotency_key)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert the log row for a delivery. The UNIQUE constraint on
    /// `idempotency_key` makes this the linearisation point: of any number
    /// of concurrent deliveries of one key, at most one insert commits.
    pub(crate) async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        idempotency_key: &str,
        status: PaymentStatus,
        payload: &serde_json::Value,
        processed_at: Timestamp,
    ) -> Result<WebhookLogId, sqlx::Error> {
        let id: i64 = query_scalar(INSERT_WEBHOOK_LOG_SQL)
            .bind(idempotency_key)
            .bind(status.as_str())
            .bind(Json(payload))
            .bind(SqlxTimestamp::from(processed_at))
            .fetch_one(&mut **tx)
            .await?;

        Ok(WebhookLogId::from_i64(id))
    }

    pub(crate) async fn set_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        log: WebhookLogId,
        order: OrderId,
    ) -> Result<(), sqlx::Error> {
        query(SET_WEBHOOK_LOG_ORDER_SQL)
            .bind(log.into_i64())
            .bind(order.into_i64())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for WebhookLogRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = PaymentStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown webhook status {status:?}").into(),
        })?;

        Ok(Self {
            id: WebhookLogId::from_i64(row.try_get("id")?),
            idempotency_key: row.try_get("idempotency_key")?,
            order_id: row
                .try_get::<Option<i64>, _>("order_id")?
                .map(OrderId::from_i64),
            status,
            payload: row.try_get("payload")?,
            processed_at: row.try_get::<SqlxTimestamp, _>("processed_at")?.to_jiff(),
        })
    }
}
