use std::sync::Arc;

use log::{error, warn};
use time::OffsetDateTime;

use crate::domain::gateway::{GatewaySelection, GatewayType};
use crate::domain::health::GatewayHealth;
use crate::domain::health_store::HealthStore;
use crate::infrastructure::health::health_cache::HealthCache;

/// Base URLs of the two gateways, resolved once from configuration.
#[derive(Debug, Clone)]
pub struct GatewayEndpoints {
	pub default_url:  String,
	pub fallback_url: String,
}

impl GatewayEndpoints {
	fn base_url(&self, gateway: GatewayType) -> &str {
		match gateway {
			GatewayType::Default => &self.default_url,
			GatewayType::Fallback => &self.fallback_url,
		}
	}

	pub fn payment_endpoint(&self, gateway: GatewayType) -> String {
		format!("{}/payments", self.base_url(gateway).trim_end_matches('/'))
	}

	pub fn health_endpoint(&self, gateway: GatewayType) -> String {
		format!(
			"{}/payments/service-health",
			self.base_url(gateway).trim_end_matches('/')
		)
	}
}

/// Maps the current health snapshots to a routing decision. The default
/// gateway is preferred unconditionally whenever it is healthy, even when the
/// fallback reports a lower response time: routing through the default is
/// cheaper to operate, and that preference is a fixed policy, not a latency
/// race.
#[derive(Clone)]
pub struct GatewaySelector {
	cache:     HealthCache,
	store:     Arc<dyn HealthStore>,
	endpoints: GatewayEndpoints,
}

impl GatewaySelector {
	pub fn new(
		cache: HealthCache,
		store: Arc<dyn HealthStore>,
		endpoints: GatewayEndpoints,
	) -> Self {
		Self {
			cache,
			store,
			endpoints,
		}
	}

	pub fn selection_for(&self, gateway: GatewayType) -> GatewaySelection {
		GatewaySelection {
			gateway,
			endpoint: self.endpoints.payment_endpoint(gateway),
		}
	}

	/// `None` means "no gateway currently available"; callers must treat that
	/// as retryable, never permanent.
	pub async fn select_best_gateway(&self) -> Option<GatewaySelection> {
		for gateway in GatewayType::ALL {
			if let Some(health) = self.current_health(gateway).await {
				if !health.failing {
					return Some(self.selection_for(gateway));
				}
			}
		}
		warn!("No gateway is currently available for processing payments");
		None
	}

	/// Cache first; on a miss the cache is rebuilt lazily from the persisted
	/// copy. Staleness applies to both sources.
	async fn current_health(&self, gateway: GatewayType) -> Option<GatewayHealth> {
		if let Some(health) = self.cache.get(gateway) {
			return Some(health);
		}

		match self.store.get(gateway).await {
			Ok(Some(health)) => {
				self.cache.put(gateway, health.clone());
				if health
					.is_stale(self.cache.freshness(), OffsetDateTime::now_utc())
				{
					None
				} else {
					Some(health)
				}
			}
			Ok(None) => None,
			Err(e) => {
				error!("Failed to read persisted health for {gateway}: {e}");
				None
			}
		}
	}
}
