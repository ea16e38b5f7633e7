use derive_more::derive::{Display, Error};

/// Failures surfaced by the durable stores.
#[derive(Debug, Display, Error)]
pub enum StoreError {
	/// The `correlation_id` uniqueness constraint rejected the write. This is
	/// a domain-level duplicate, not a transient condition.
	#[display("duplicate correlation id")]
	DuplicateCorrelationId,
	/// Any other storage failure. Retryable from the queue's point of view.
	#[display("storage failure: {message}")]
	Backend {
		#[error(not(source))]
		message: String,
	},
}

impl StoreError {
	pub fn backend(cause: impl std::fmt::Display) -> Self {
		StoreError::Backend {
			message: cause.to_string(),
		}
	}

	pub fn is_duplicate(&self) -> bool {
		matches!(self, StoreError::DuplicateCorrelationId)
	}
}

/// Failures while driving one queued payment towards a terminal state. Every
/// variant is retryable: the worker compares the retry count against the
/// configured ceiling and either releases the lease or drops the message.
#[derive(Debug, Display, Error)]
pub enum ProcessingError {
	#[display("no payment gateway is currently available")]
	NoGatewayAvailable,
	#[display("gateway call failed")]
	GatewayFailure,
	#[display("ledger write failed: {_0}")]
	LedgerWrite(StoreError),
}
