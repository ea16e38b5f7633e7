use crate::domain::error::StoreError;
use crate::domain::ledger::PaymentLedger;
use crate::domain::queue::PaymentQueueStore;

#[derive(Clone)]
pub struct PurgePaymentsUseCase<Q: PaymentQueueStore, L: PaymentLedger> {
	queue:  Q,
	ledger: L,
}

impl<Q: PaymentQueueStore, L: PaymentLedger> PurgePaymentsUseCase<Q, L> {
	pub fn new(queue: Q, ledger: L) -> Self {
		Self { queue, ledger }
	}

	pub async fn execute(&self) -> Result<(), StoreError> {
		self.queue.purge().await?;
		self.ledger.purge().await
	}
}
