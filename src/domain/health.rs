use time::{Duration, OffsetDateTime};

/// Response time recorded when a gateway could not be probed at all.
const UNREACHABLE_RESPONSE_TIME_MS: i64 = 100_000_000;

/// Health snapshot for one gateway, as reported by its service-health
/// endpoint. A snapshot older than the freshness window must be treated as
/// absent by readers.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayHealth {
	pub failing:              bool,
	pub min_response_time_ms: i64,
	pub last_checked:         OffsetDateTime,
}

impl GatewayHealth {
	/// Sentinel written when a probe times out, errors or returns garbage.
	/// Absence of a signal degrades to "assume unhealthy", never to healthy.
	pub fn unreachable(now: OffsetDateTime) -> Self {
		Self {
			failing:              true,
			min_response_time_ms: UNREACHABLE_RESPONSE_TIME_MS,
			last_checked:         now,
		}
	}

	pub fn is_stale(&self, window: Duration, now: OffsetDateTime) -> bool {
		now - self.last_checked > window
	}
}
