use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgPool;
use time::OffsetDateTime;

use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::health::GatewayHealth;
use crate::domain::health_store::HealthStore;

const SAVE_HEALTH_SQL: &str = "INSERT INTO gateway_health \
	 (key, failing, min_response_time, timestamp) \
	 VALUES ($1, $2, $3, $4) \
	 ON CONFLICT (key) DO UPDATE \
	 SET failing = $2, min_response_time = $3, timestamp = $4";

const GET_HEALTH_SQL: &str = "SELECT failing, min_response_time, timestamp \
	 FROM gateway_health WHERE key = $1";

/// Relational backend for the persisted health snapshots, keyed by the
/// gateway's health key.
#[derive(Clone)]
pub struct PostgresHealthStore {
	pool: PgPool,
}

impl PostgresHealthStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl HealthStore for PostgresHealthStore {
	async fn get(
		&self,
		gateway: GatewayType,
	) -> Result<Option<GatewayHealth>, StoreError> {
		let row = sqlx::query(GET_HEALTH_SQL)
			.bind(gateway.health_key())
			.fetch_optional(&self.pool)
			.await
			.map_err(StoreError::backend)?;

		let Some(row) = row else {
			return Ok(None);
		};

		let failing: bool = row.try_get("failing").map_err(StoreError::backend)?;
		let min_response_time_ms: i64 = row
			.try_get("min_response_time")
			.map_err(StoreError::backend)?;
		let last_checked: OffsetDateTime =
			row.try_get("timestamp").map_err(StoreError::backend)?;

		Ok(Some(GatewayHealth {
			failing,
			min_response_time_ms,
			last_checked,
		}))
	}

	async fn save(
		&self,
		gateway: GatewayType,
		health: &GatewayHealth,
	) -> Result<(), StoreError> {
		sqlx::query(SAVE_HEALTH_SQL)
			.bind(gateway.health_key())
			.bind(health.failing)
			.bind(health.min_response_time_ms)
			.bind(health.last_checked)
			.execute(&self.pool)
			.await
			.map_err(StoreError::backend)?;
		Ok(())
	}
}
