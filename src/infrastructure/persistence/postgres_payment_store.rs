use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::ledger::{PaymentLedger, PaymentSummary};
use crate::domain::payment::{PaymentRecord, QueuedPayment};
use crate::domain::queue::PaymentQueueStore;

/// Claims up to `$1` pending rows oldest-first and flips them to PROCESSING
/// in one atomic statement. `SKIP LOCKED` keeps concurrent reservations from
/// ever handing out the same row or blocking on each other.
const RESERVE_BATCH_SQL: &str = "UPDATE payment_queue \
	 SET status = 'PROCESSING', consumer_name = $2, reserved_at = now() \
	 WHERE id IN ( \
	   SELECT id FROM payment_queue \
	   WHERE status = 'PENDING' \
	   ORDER BY created_at \
	   LIMIT $1 FOR UPDATE SKIP LOCKED \
	 ) RETURNING id, correlation_id, amount, gateway_type, status_code, \
	   created_at, retry_count";

const ENQUEUE_SQL: &str = "INSERT INTO payment_queue \
	 (correlation_id, amount, gateway_type, status_code, created_at) \
	 VALUES ($1, $2, $3, $4, $5)";

const INCREMENT_RETRY_SQL: &str = "UPDATE payment_queue \
	 SET retry_count = retry_count + 1, status = 'PENDING', \
	     consumer_name = NULL \
	 WHERE id = $1 RETURNING retry_count";

const RELEASE_STALE_LEASES_SQL: &str = "UPDATE payment_queue \
	 SET status = 'PENDING', consumer_name = NULL \
	 WHERE status = 'PROCESSING' \
	   AND reserved_at < now() - make_interval(secs => $1)";

const SAVE_LEDGER_SQL: &str = "INSERT INTO payments \
	 (correlation_id, amount, gateway_type, status_code) \
	 VALUES ($1, $2, $3, $4)";

const SUMMARY_SQL: &str = "SELECT gateway_type, \
	   COUNT(*) AS total_requests, \
	   COALESCE(SUM(amount), 0)::BIGINT AS total_amount \
	 FROM payments \
	 WHERE ($1::timestamptz IS NULL OR created_at >= $1) \
	   AND ($2::timestamptz IS NULL OR created_at <= $2) \
	 GROUP BY gateway_type";

#[derive(sqlx::FromRow)]
struct QueueRow {
	id:             i64,
	correlation_id: Uuid,
	amount:         i64,
	gateway_type:   Option<String>,
	status_code:    i32,
	created_at:     OffsetDateTime,
	retry_count:    i32,
}

impl From<QueueRow> for QueuedPayment {
	fn from(row: QueueRow) -> Self {
		QueuedPayment {
			message_id: row.id,
			record:     PaymentRecord {
				correlation_id:  row.correlation_id,
				amount_in_cents: row.amount,
				gateway_type:    row
					.gateway_type
					.as_deref()
					.and_then(GatewayType::from_name),
				status_code:     row.status_code,
				requested_at:    row.created_at,
				retry_count:     row.retry_count,
			},
		}
	}
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
	if let sqlx::Error::Database(db) = &e {
		if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
			return StoreError::DuplicateCorrelationId;
		}
	}
	StoreError::backend(e)
}

/// Relational backing for both the payment queue and the permanent ledger.
#[derive(Clone)]
pub struct PostgresPaymentStore {
	pool: PgPool,
}

impl PostgresPaymentStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl PaymentQueueStore for PostgresPaymentStore {
	async fn enqueue(&self, record: &PaymentRecord) -> Result<(), StoreError> {
		sqlx::query(ENQUEUE_SQL)
			.bind(record.correlation_id)
			.bind(record.amount_in_cents)
			.bind(record.gateway_type.map(|g| g.as_str()))
			.bind(record.status_code)
			.bind(record.requested_at)
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		Ok(())
	}

	async fn reserve_batch(
		&self,
		max_size: i64,
		consumer_name: &str,
	) -> Result<Vec<QueuedPayment>, StoreError> {
		let rows: Vec<QueueRow> = sqlx::query_as(RESERVE_BATCH_SQL)
			.bind(max_size)
			.bind(consumer_name)
			.fetch_all(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		Ok(rows.into_iter().map(QueuedPayment::from).collect())
	}

	async fn ack(&self, message_id: i64) -> Result<(), StoreError> {
		sqlx::query("DELETE FROM payment_queue WHERE id = $1")
			.bind(message_id)
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		Ok(())
	}

	async fn increment_retry(&self, message_id: i64) -> Result<i32, StoreError> {
		let row = sqlx::query(INCREMENT_RETRY_SQL)
			.bind(message_id)
			.fetch_one(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		row.try_get("retry_count").map_err(StoreError::backend)
	}

	async fn release_stale_leases(
		&self,
		older_than: Duration,
	) -> Result<u64, StoreError> {
		let result = sqlx::query(RELEASE_STALE_LEASES_SQL)
			.bind(older_than.as_seconds_f64())
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		Ok(result.rows_affected())
	}

	async fn purge(&self) -> Result<(), StoreError> {
		sqlx::query("TRUNCATE payment_queue")
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		Ok(())
	}
}

#[async_trait]
impl PaymentLedger for PostgresPaymentStore {
	async fn save(&self, record: &PaymentRecord) -> Result<(), StoreError> {
		sqlx::query(SAVE_LEDGER_SQL)
			.bind(record.correlation_id)
			.bind(record.amount_in_cents)
			.bind(record.gateway_type.map(|g| g.as_str()))
			.bind(record.status_code)
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		Ok(())
	}

	async fn summary(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<HashMap<GatewayType, PaymentSummary>, StoreError> {
		let rows = sqlx::query(SUMMARY_SQL)
			.bind(from)
			.bind(to)
			.fetch_all(&self.pool)
			.await
			.map_err(map_sqlx_error)?;

		let mut per_gateway = HashMap::new();
		for row in rows {
			let name: Option<String> =
				row.try_get("gateway_type").map_err(StoreError::backend)?;
			let Some(gateway) = name.as_deref().and_then(GatewayType::from_name)
			else {
				continue;
			};
			let total_requests: i64 =
				row.try_get("total_requests").map_err(StoreError::backend)?;
			let total_amount: i64 =
				row.try_get("total_amount").map_err(StoreError::backend)?;
			per_gateway.insert(gateway, PaymentSummary {
				total_requests,
				total_amount_in_cents: total_amount,
			});
		}
		Ok(per_gateway)
	}

	async fn purge(&self) -> Result<(), StoreError> {
		sqlx::query("TRUNCATE payments")
			.execute(&self.pool)
			.await
			.map_err(map_sqlx_error)?;
		Ok(())
	}
}
