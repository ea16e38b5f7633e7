use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::ledger::PaymentSummary;

#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
	pub correlation_id:  Uuid,
	pub amount_in_cents: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct GetPaymentSummaryQuery {
	pub from: Option<OffsetDateTime>,
	pub to:   Option<OffsetDateTime>,
}

/// Per-gateway totals, always populated for every known gateway so that
/// callers never special-case a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentsSummary {
	pub default:  PaymentSummary,
	pub fallback: PaymentSummary,
}
