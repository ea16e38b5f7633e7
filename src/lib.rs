use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::info;
use reqwest::Client;
use sqlx::postgres::PgPoolOptions;

pub mod adapters;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;

#[cfg(test)]
pub mod test_support;

use crate::adapters::web::payments_handler::payments;
use crate::adapters::web::payments_purge_handler::payments_purge;
use crate::adapters::web::payments_summary_handler::payments_summary;
use crate::config::{Config, HealthStoreBackend};
use crate::domain::health_store::HealthStore;
use crate::infrastructure::gateway::http_payment_gateway::HttpPaymentGateway;
use crate::infrastructure::health::health_cache::HealthCache;
use crate::infrastructure::persistence::postgres_health_store::PostgresHealthStore;
use crate::infrastructure::persistence::postgres_payment_store::PostgresPaymentStore;
use crate::infrastructure::persistence::redis_health_store::RedisHealthStore;
use crate::infrastructure::routing::gateway_selector::{
	GatewayEndpoints, GatewaySelector,
};
use crate::infrastructure::workers::health_monitor_worker::{
	HealthMonitor, health_monitor_worker,
};
use crate::infrastructure::workers::payment_worker::{
	WorkerSettings, payment_worker,
};
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::process_payment::ProcessPaymentUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

fn startup_error(cause: impl std::fmt::Display) -> std::io::Error {
	std::io::Error::other(cause.to_string())
}

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	env_logger::init();

	let pool = PgPoolOptions::new()
		.max_connections(config.db_max_connections)
		.connect(&config.database_url)
		.await
		.map_err(startup_error)?;

	sqlx::migrate!("./migrations")
		.run(&pool)
		.await
		.map_err(startup_error)?;

	let store = PostgresPaymentStore::new(pool.clone());

	let health_store: Arc<dyn HealthStore> = match config.health_store_backend {
		HealthStoreBackend::Postgres => {
			Arc::new(PostgresHealthStore::new(pool.clone()))
		}
		HealthStoreBackend::Redis => {
			let redis_url = config.redis_url.clone().ok_or_else(|| {
				startup_error(
					"APP_REDIS_URL is required when the health store backend \
					 is redis",
				)
			})?;
			let client =
				redis::Client::open(redis_url).map_err(startup_error)?;
			Arc::new(RedisHealthStore::new(client))
		}
	};

	let endpoints = GatewayEndpoints {
		default_url:  config.default_gateway_url.clone(),
		fallback_url: config.fallback_gateway_url.clone(),
	};
	let freshness = time::Duration::milliseconds(config.health_freshness_ms);
	let health_cache = HealthCache::new(freshness);

	let probe_client = Client::builder()
		.timeout(Duration::from_millis(config.health_probe_timeout_ms))
		.build()
		.map_err(startup_error)?;
	let monitor = HealthMonitor::new(
		health_cache.clone(),
		health_store.clone(),
		probe_client,
		endpoints.clone(),
		freshness,
	);

	info!("Starting health monitor worker...");
	tokio::spawn(health_monitor_worker(
		monitor,
		Duration::from_millis(config.health_check_interval_ms),
	));

	let selector = GatewaySelector::new(
		health_cache.clone(),
		health_store.clone(),
		endpoints.clone(),
	);
	let gateway_client = Client::builder()
		.timeout(Duration::from_millis(config.gateway_timeout_ms))
		.build()
		.map_err(startup_error)?;
	let gateway = HttpPaymentGateway::new(gateway_client, selector);

	let worker_settings = WorkerSettings {
		batch_size:    config.batch_size,
		max_retries:   config.max_retries_reenqueue,
		lease_timeout: time::Duration::milliseconds(config.lease_timeout_ms),
		..WorkerSettings::default()
	};

	info!(
		"Starting {} payment worker instance(s)...",
		config.worker_instances
	);
	for instance in 0..config.worker_instances {
		let orchestrator =
			ProcessPaymentUseCase::new(gateway.clone(), store.clone());
		tokio::spawn(payment_worker(
			store.clone(),
			orchestrator,
			format!("worker-{instance}"),
			worker_settings.clone(),
		));
	}

	let create_payment_use_case = CreatePaymentUseCase::new(store.clone());
	let get_payment_summary_use_case =
		GetPaymentSummaryUseCase::new(store.clone());
	let purge_payments_use_case =
		PurgePaymentsUseCase::new(store.clone(), store.clone());

	let server_port = config.server_port;
	let server_keepalive = config.server_keepalive;
	info!("Starting HTTP server on 0.0.0.0:{server_port}...");
	HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(create_payment_use_case.clone()))
			.app_data(web::Data::new(get_payment_summary_use_case.clone()))
			.app_data(web::Data::new(purge_payments_use_case.clone()))
			.service(payments)
			.service(payments_summary)
			.service(payments_purge)
	})
	.keep_alive(Duration::from_secs(server_keepalive))
	.bind(("0.0.0.0", server_port))?
	.run()
	.await
}
