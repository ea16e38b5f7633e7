use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;

use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::health::GatewayHealth;
use crate::domain::health_store::HealthStore;

/// Key-value backend for the persisted health snapshots, interchangeable with
/// the relational one. Snapshots live in one hash per gateway.
#[derive(Clone)]
pub struct RedisHealthStore {
	client: Client,
}

impl RedisHealthStore {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	fn hash_key(gateway: GatewayType) -> String {
		format!("gateway_health:{}", gateway.health_key())
	}
}

#[async_trait]
impl HealthStore for RedisHealthStore {
	async fn get(
		&self,
		gateway: GatewayType,
	) -> Result<Option<GatewayHealth>, StoreError> {
		let mut con = self
			.client
			.get_multiplexed_async_connection()
			.await
			.map_err(StoreError::backend)?;

		let fields: std::collections::HashMap<String, String> = con
			.hgetall(Self::hash_key(gateway))
			.await
			.map_err(StoreError::backend)?;

		if fields.is_empty() {
			return Ok(None);
		}

		let failing = fields
			.get("failing")
			.map(|v| v == "1")
			.unwrap_or(true);
		let min_response_time_ms = fields
			.get("min_response_time")
			.and_then(|v| v.parse::<i64>().ok())
			.unwrap_or_default();
		let last_checked = fields
			.get("last_checked")
			.and_then(|v| v.parse::<i64>().ok())
			.and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
			.ok_or_else(|| StoreError::backend("malformed health snapshot"))?;

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
		let mut con = self
			.client
			.get_multiplexed_async_connection()
			.await
			.map_err(StoreError::backend)?;

		let _: () = con
			.hset_multiple(Self::hash_key(gateway), &[
				("failing", if health.failing { "1" } else { "0" }.to_string()),
				(
					"min_response_time",
					health.min_response_time_ms.to_string(),
				),
				(
					"last_checked",
					health.last_checked.unix_timestamp().to_string(),
				),
			])
			.await
			.map_err(StoreError::backend)?;

		Ok(())
	}
}
