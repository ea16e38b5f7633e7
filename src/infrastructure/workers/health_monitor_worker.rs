use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;
use time::OffsetDateTime;
use tokio::time::sleep;

use crate::domain::gateway::GatewayType;
use crate::domain::health::GatewayHealth;
use crate::domain::health_store::HealthStore;
use crate::infrastructure::health::health_cache::HealthCache;
use crate::infrastructure::routing::gateway_selector::GatewayEndpoints;

#[derive(Debug, Deserialize)]
struct ServiceHealthResponse {
	failing:           bool,
	#[serde(rename = "minResponseTime")]
	min_response_time: i64,
}

/// Probes both gateways' service-health endpoints, refreshing the in-memory
/// cache and the persisted copy. Probes must never block on a slow gateway:
/// the HTTP client handed in here carries a short timeout.
#[derive(Clone)]
pub struct HealthMonitor {
	cache:       HealthCache,
	store:       Arc<dyn HealthStore>,
	http:        Client,
	endpoints:   GatewayEndpoints,
	skip_window: time::Duration,
}

impl HealthMonitor {
	pub fn new(
		cache: HealthCache,
		store: Arc<dyn HealthStore>,
		http: Client,
		endpoints: GatewayEndpoints,
		skip_window: time::Duration,
	) -> Self {
		Self {
			cache,
			store,
			http,
			endpoints,
			skip_window,
		}
	}

	pub async fn probe_all(&self) {
		for gateway in GatewayType::ALL {
			self.probe(gateway).await;
		}
	}

	async fn probe(&self, gateway: GatewayType) {
		if self.should_skip(gateway).await {
			debug!("Skipping health probe for {gateway}: last check is recent");
			return;
		}

		let url = self.endpoints.health_endpoint(gateway);
		let health = match self.fetch(&url).await {
			Ok(health) => {
				info!(
					"Health probe for {gateway}: failing={}, \
					 min_response_time={}ms",
					health.failing, health.min_response_time_ms
				);
				health
			}
			Err(e) => {
				// No signal degrades to "assume unhealthy".
				error!("Health probe for {gateway} failed: {e}");
				GatewayHealth::unreachable(OffsetDateTime::now_utc())
			}
		};

		self.cache.put(gateway, health.clone());
		if let Err(e) = self.store.save(gateway, &health).await {
			// A persistence hiccup must not abort the probe cycle.
			error!("Failed to persist health snapshot for {gateway}: {e}");
		}
	}

	async fn fetch(&self, url: &str) -> Result<GatewayHealth, reqwest::Error> {
		let response = self.http.get(url).send().await?.error_for_status()?;
		let body: ServiceHealthResponse = response.json().await?;
		Ok(GatewayHealth {
			failing:              body.failing,
			min_response_time_ms: body.min_response_time,
			last_checked:         OffsetDateTime::now_utc(),
		})
	}

	/// Avoids redundant external calls when multiple triggers overlap: if the
	/// persisted snapshot is younger than the skip window, this cycle passes.
	async fn should_skip(&self, gateway: GatewayType) -> bool {
		match self.store.get(gateway).await {
			Ok(Some(health)) => {
				!health.is_stale(self.skip_window, OffsetDateTime::now_utc())
			}
			Ok(None) => false,
			Err(e) => {
				error!("Failed to read persisted health for {gateway}: {e}");
				false
			}
		}
	}
}

/// Periodic probing loop. Failures degrade the cached signal; nothing in here
/// can crash the timer.
pub async fn health_monitor_worker(monitor: HealthMonitor, period: Duration) {
	loop {
		monitor.probe_all().await;
		sleep(period).await;
	}
}
