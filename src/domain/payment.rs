use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::gateway::GatewayType;

/// One payment intent. Amounts are exact integer cents; no floating point
/// enters the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
	pub correlation_id:  Uuid,
	pub amount_in_cents: i64,
	pub gateway_type:    Option<GatewayType>,
	/// Last observed outcome code from a gateway, 0 while unresolved.
	pub status_code:     i32,
	pub requested_at:    OffsetDateTime,
	pub retry_count:     i32,
}

impl PaymentRecord {
	pub fn new(correlation_id: Uuid, amount_in_cents: i64) -> Self {
		Self {
			correlation_id,
			amount_in_cents,
			gateway_type: None,
			status_code: 0,
			requested_at: OffsetDateTime::now_utc(),
			retry_count: 0,
		}
	}
}

/// A queue row reserved by one worker: the record plus the row identity the
/// worker needs to ack or release it.
#[derive(Debug, Clone)]
pub struct QueuedPayment {
	pub message_id: i64,
	pub record:     PaymentRecord,
}
