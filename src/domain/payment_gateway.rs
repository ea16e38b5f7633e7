use async_trait::async_trait;

use crate::domain::gateway::GatewayType;
use crate::domain::payment::PaymentRecord;

/// Classified reply from a single send attempt against an external gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply {
	/// 2xx from the gateway.
	Accepted {
		gateway:     GatewayType,
		status_code: i32,
		message:     String,
	},
	/// 422: the gateway already holds this correlation id. Terminal, not
	/// retryable.
	Duplicate {
		gateway:     GatewayType,
		status_code: i32,
		message:     String,
	},
	/// No gateway passed the health check; no network call was attempted.
	Unavailable,
	/// Transport error, timeout, or a non-2xx/422 status.
	Failed,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
	async fn process(&self, record: &PaymentRecord) -> GatewayReply;

	/// Contingency mode: force every subsequent call to the fallback gateway
	/// regardless of health.
	fn set_contingency(&self, enabled: bool);
}
