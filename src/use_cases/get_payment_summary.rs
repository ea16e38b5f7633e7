use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::ledger::{PaymentLedger, PaymentSummary};
use crate::use_cases::dto::{GetPaymentSummaryQuery, PaymentsSummary};

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<L: PaymentLedger> {
	ledger: L,
}

impl<L: PaymentLedger> GetPaymentSummaryUseCase<L> {
	pub fn new(ledger: L) -> Self {
		Self { ledger }
	}

	/// Aggregate the ledger over `[from, to]`. Gateways with no matching rows
	/// come back zero-filled, never missing.
	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummary, StoreError> {
		let per_gateway = self.ledger.summary(query.from, query.to).await?;

		Ok(PaymentsSummary {
			default:  per_gateway
				.get(&GatewayType::Default)
				.copied()
				.unwrap_or(PaymentSummary::default()),
			fallback: per_gateway
				.get(&GatewayType::Fallback)
				.copied()
				.unwrap_or(PaymentSummary::default()),
		})
	}
}
