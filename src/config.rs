use serde::Deserialize;

/// Backend for the persisted gateway-health snapshots.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStoreBackend {
	Postgres,
	Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub database_url: String,
	/// Only required when `health_store_backend` is `redis`.
	pub redis_url: Option<String>,
	pub health_store_backend: HealthStoreBackend,
	pub default_gateway_url: String,
	pub fallback_gateway_url: String,
	pub server_port: u16,
	pub server_keepalive: u64,
	pub db_max_connections: u32,
	/// Number of independent worker polling loops.
	pub worker_instances: usize,
	pub batch_size: i64,
	/// Ceiling after which a failing message is dropped instead of retried.
	pub max_retries_reenqueue: i32,
	pub health_check_interval_ms: u64,
	/// Freshness window for cached health snapshots.
	pub health_freshness_ms: i64,
	pub health_probe_timeout_ms: u64,
	pub gateway_timeout_ms: u64,
	/// Age after which a `PROCESSING` lease is reclaimed.
	pub lease_timeout_ms: i64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.set_default("health_store_backend", "postgres")?
			.set_default("server_port", 9999)?
			.set_default("server_keepalive", 60)?
			.set_default("db_max_connections", 10)?
			.set_default("worker_instances", 1)?
			.set_default("batch_size", 30)?
			.set_default("max_retries_reenqueue", 3)?
			.set_default("health_check_interval_ms", 10_000)?
			.set_default("health_freshness_ms", 6_000)?
			.set_default("health_probe_timeout_ms", 200)?
			.set_default("gateway_timeout_ms", 5_000)?
			.set_default("lease_timeout_ms", 60_000)?
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}
}

#[cfg(test)]
mod tests {
	use std::env;

	use super::*;

	#[test]
	fn test_config_load() {
		unsafe {
			env::set_var("APP_DATABASE_URL", "postgres://test_db/payments");
			env::set_var("APP_DEFAULT_GATEWAY_URL", "http://test_default/");
			env::set_var("APP_FALLBACK_GATEWAY_URL", "http://test_fallback/");
			env::set_var("APP_WORKER_INSTANCES", "4");
			env::set_var("APP_MAX_RETRIES_REENQUEUE", "2");
		};

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config.database_url, "postgres://test_db/payments");
		assert_eq!(config.default_gateway_url, "http://test_default/");
		assert_eq!(config.fallback_gateway_url, "http://test_fallback/");
		assert_eq!(config.worker_instances, 4);
		assert_eq!(config.max_retries_reenqueue, 2);
		assert_eq!(config.redis_url, None);

		// Defaults for everything not set explicitly.
		assert_eq!(config.health_store_backend, HealthStoreBackend::Postgres);
		assert_eq!(config.server_port, 9999);
		assert_eq!(config.batch_size, 30);
		assert_eq!(config.health_freshness_ms, 6_000);
		assert_eq!(config.health_probe_timeout_ms, 200);

		unsafe {
			env::remove_var("APP_DATABASE_URL");
			env::remove_var("APP_DEFAULT_GATEWAY_URL");
			env::remove_var("APP_FALLBACK_GATEWAY_URL");
			env::remove_var("APP_WORKER_INSTANCES");
			env::remove_var("APP_MAX_RETRIES_REENQUEUE");
		}
	}
}
