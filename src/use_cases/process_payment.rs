use log::{error, info};

use crate::domain::error::{ProcessingError, StoreError};
use crate::domain::ledger::PaymentLedger;
use crate::domain::payment::PaymentRecord;
use crate::domain::payment_gateway::{GatewayReply, PaymentGateway};

/// Terminal classification of one processing attempt. Both variants make the
/// queue row ack-eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
	Succeeded,
	/// The gateway already holds this correlation id; there is nothing left
	/// to do for this payment.
	Duplicate,
}

/// Drives one in-flight payment to a terminal state: send it through the
/// gateway, classify the reply, and persist the outcome to the ledger.
#[derive(Clone)]
pub struct ProcessPaymentUseCase<G: PaymentGateway, L: PaymentLedger> {
	gateway: G,
	ledger:  L,
}

impl<G: PaymentGateway, L: PaymentLedger> ProcessPaymentUseCase<G, L> {
	pub fn new(gateway: G, ledger: L) -> Self {
		Self { gateway, ledger }
	}

	pub async fn execute(
		&self,
		mut record: PaymentRecord,
	) -> Result<ProcessingStatus, ProcessingError> {
		match self.gateway.process(&record).await {
			GatewayReply::Accepted {
				gateway,
				status_code,
				..
			} => {
				record.gateway_type = Some(gateway);
				record.status_code = status_code;
				self.write_ledger(&record).await?;
				info!(
					"Payment {} settled through the {gateway} gateway",
					record.correlation_id
				);
				Ok(ProcessingStatus::Succeeded)
			}
			GatewayReply::Duplicate {
				gateway,
				status_code,
				..
			} => {
				record.gateway_type = Some(gateway);
				record.status_code = status_code;
				self.write_ledger(&record).await?;
				info!(
					"Payment {} already known to the {gateway} gateway, \
					 recording as duplicate",
					record.correlation_id
				);
				Ok(ProcessingStatus::Duplicate)
			}
			GatewayReply::Unavailable => Err(ProcessingError::NoGatewayAvailable),
			GatewayReply::Failed => Err(ProcessingError::GatewayFailure),
		}
	}

	/// A ledger rejection on `correlation_id` means an earlier at-least-once
	/// attempt already recorded this payment; that is success, not failure.
	/// Any other write failure must NOT ack the row: losing the ledger entry
	/// is worse than re-attempting the gateway call.
	async fn write_ledger(
		&self,
		record: &PaymentRecord,
	) -> Result<(), ProcessingError> {
		match self.ledger.save(record).await {
			Ok(()) => Ok(()),
			Err(StoreError::DuplicateCorrelationId) => Ok(()),
			Err(e) => {
				error!(
					"Ledger write failed for {}: {e}; leaving the message for \
					 retry",
					record.correlation_id
				);
				Err(ProcessingError::LedgerWrite(e))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use uuid::Uuid;

	use super::*;
	use crate::domain::gateway::GatewayType;
	use crate::test_support::{LedgerMode, RecordingLedger, ScriptedGateway};

	fn record() -> PaymentRecord {
		PaymentRecord::new(Uuid::new_v4(), 1500)
	}

	#[tokio::test]
	async fn test_accepted_reply_is_ledgered_and_succeeds() {
		let ledger = RecordingLedger::new();
		let gateway = ScriptedGateway::with_replies(vec![GatewayReply::Accepted {
			gateway:     GatewayType::Default,
			status_code: 200,
			message:     "payment processed successfully".to_string(),
		}]);
		let use_case = ProcessPaymentUseCase::new(gateway, ledger.clone());

		let status = use_case.execute(record()).await.unwrap();

		assert_eq!(status, ProcessingStatus::Succeeded);
		let saved = ledger.saved();
		assert_eq!(saved.len(), 1);
		assert_eq!(saved[0].gateway_type, Some(GatewayType::Default));
		assert_eq!(saved[0].status_code, 200);
	}

	#[tokio::test]
	async fn test_422_reply_is_ledgered_as_duplicate() {
		let ledger = RecordingLedger::new();
		let gateway =
			ScriptedGateway::with_replies(vec![GatewayReply::Duplicate {
				gateway:     GatewayType::Fallback,
				status_code: 422,
				message:     "correlation id already exists".to_string(),
			}]);
		let use_case = ProcessPaymentUseCase::new(gateway, ledger.clone());

		let status = use_case.execute(record()).await.unwrap();

		assert_eq!(status, ProcessingStatus::Duplicate);
		let saved = ledger.saved();
		assert_eq!(saved.len(), 1);
		assert_eq!(saved[0].status_code, 422);
	}

	#[tokio::test]
	async fn test_gateway_failure_skips_ledger() {
		let ledger = RecordingLedger::new();
		let gateway = ScriptedGateway::with_replies(vec![GatewayReply::Failed]);
		let use_case = ProcessPaymentUseCase::new(gateway, ledger.clone());

		let result = use_case.execute(record()).await;

		assert!(matches!(result, Err(ProcessingError::GatewayFailure)));
		assert!(ledger.saved().is_empty());
	}

	#[tokio::test]
	async fn test_no_gateway_available_skips_ledger() {
		let ledger = RecordingLedger::new();
		let gateway =
			ScriptedGateway::with_replies(vec![GatewayReply::Unavailable]);
		let use_case = ProcessPaymentUseCase::new(gateway, ledger.clone());

		let result = use_case.execute(record()).await;

		assert!(matches!(result, Err(ProcessingError::NoGatewayAvailable)));
		assert!(ledger.saved().is_empty());
	}

	#[tokio::test]
	async fn test_ledger_write_failure_propagates() {
		let ledger = RecordingLedger::new();
		ledger.set_mode(LedgerMode::Failing);
		let gateway = ScriptedGateway::with_replies(vec![GatewayReply::Accepted {
			gateway:     GatewayType::Default,
			status_code: 200,
			message:     "payment processed successfully".to_string(),
		}]);
		let use_case = ProcessPaymentUseCase::new(gateway, ledger.clone());

		let result = use_case.execute(record()).await;

		assert!(matches!(result, Err(ProcessingError::LedgerWrite(_))));
	}

	#[tokio::test]
	async fn test_ledger_duplicate_rejection_counts_as_success() {
		let ledger = RecordingLedger::new();
		ledger.set_mode(LedgerMode::RejectingDuplicates);
		let gateway = ScriptedGateway::with_replies(vec![GatewayReply::Accepted {
			gateway:     GatewayType::Default,
			status_code: 200,
			message:     "payment processed successfully".to_string(),
		}]);
		let use_case = ProcessPaymentUseCase::new(gateway, ledger);

		let status = use_case.execute(record()).await.unwrap();

		assert_eq!(status, ProcessingStatus::Succeeded);
	}
}
