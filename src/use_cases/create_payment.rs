use crate::domain::error::StoreError;
use crate::domain::payment::PaymentRecord;
use crate::domain::queue::PaymentQueueStore;
use crate::use_cases::dto::CreatePaymentCommand;

#[derive(Clone)]
pub struct CreatePaymentUseCase<Q: PaymentQueueStore> {
	queue: Q,
}

impl<Q: PaymentQueueStore> CreatePaymentUseCase<Q> {
	pub fn new(queue: Q) -> Self {
		Self { queue }
	}

	/// Durably enqueue a payment intent. Succeeds only after the row is
	/// committed; a repeated correlation id surfaces as
	/// [`StoreError::DuplicateCorrelationId`].
	pub async fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<(), StoreError> {
		let record =
			PaymentRecord::new(command.correlation_id, command.amount_in_cents);
		self.queue.enqueue(&record).await
	}
}
