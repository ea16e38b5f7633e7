use std::sync::Arc;

use dashmap::DashMap;
use time::{Duration, OffsetDateTime};

use crate::domain::gateway::GatewayType;
use crate::domain::health::GatewayHealth;

/// Shared, time-bounded view of the gateway health snapshots. Written only by
/// the health monitor, read by any number of concurrent selectors; the
/// concurrent map is the whole synchronization story, no lock wraps the
/// business logic.
#[derive(Clone)]
pub struct HealthCache {
	entries:   Arc<DashMap<GatewayType, GatewayHealth>>,
	freshness: Duration,
}

impl HealthCache {
	pub fn new(freshness: Duration) -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
			freshness,
		}
	}

	/// An entry past the freshness window is reported as absent, bounding how
	/// stale a routing decision can get without a re-probe.
	pub fn get(&self, gateway: GatewayType) -> Option<GatewayHealth> {
		let entry = self.entries.get(&gateway)?;
		if entry.is_stale(self.freshness, OffsetDateTime::now_utc()) {
			return None;
		}
		Some(entry.value().clone())
	}

	pub fn put(&self, gateway: GatewayType, health: GatewayHealth) {
		self.entries.insert(gateway, health);
	}

	pub fn freshness(&self) -> Duration {
		self.freshness
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn healthy(last_checked: OffsetDateTime) -> GatewayHealth {
		GatewayHealth {
			failing: false,
			min_response_time_ms: 50,
			last_checked,
		}
	}

	#[test]
	fn test_fresh_entry_is_returned() {
		let cache = HealthCache::new(Duration::seconds(6));
		let now = OffsetDateTime::now_utc();
		cache.put(GatewayType::Default, healthy(now - Duration::seconds(3)));

		assert!(cache.get(GatewayType::Default).is_some());
	}

	#[test]
	fn test_stale_entry_is_absent() {
		let cache = HealthCache::new(Duration::seconds(6));
		let now = OffsetDateTime::now_utc();
		cache.put(GatewayType::Default, healthy(now - Duration::seconds(7)));

		assert!(cache.get(GatewayType::Default).is_none());
	}

	#[test]
	fn test_missing_entry_is_absent() {
		let cache = HealthCache::new(Duration::seconds(6));
		assert!(cache.get(GatewayType::Fallback).is_none());
	}

	#[test]
	fn test_put_overwrites_previous_snapshot() {
		let cache = HealthCache::new(Duration::seconds(6));
		let now = OffsetDateTime::now_utc();
		cache.put(GatewayType::Default, healthy(now));
		cache.put(GatewayType::Default, GatewayHealth::unreachable(now));

		let entry = cache.get(GatewayType::Default).unwrap();
		assert!(entry.failing);
	}
}
