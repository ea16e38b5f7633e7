use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::payment::PaymentRecord;

/// Aggregate of resolved payments for one gateway over a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaymentSummary {
	pub total_requests:        i64,
	pub total_amount_in_cents: i64,
}

/// Permanent record of resolved payment outcomes, distinct from the transient
/// queue. Keyed uniquely by correlation id, which makes `save` idempotent
/// under at-least-once delivery.
#[async_trait]
pub trait PaymentLedger: Send + Sync + 'static {
	async fn save(&self, record: &PaymentRecord) -> Result<(), StoreError>;

	/// Aggregate ledger rows in `[from, to]`; either bound may be open.
	/// Gateways with no matching rows are simply absent from the map; callers
	/// are expected to zero-fill.
	async fn summary(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<HashMap<GatewayType, PaymentSummary>, StoreError>;

	/// Drop every ledger row. Test/ops surface only.
	async fn purge(&self) -> Result<(), StoreError>;
}
