use std::time::Duration;

use futures::future::join_all;
use log::{error, info, warn};
use tokio::time::sleep;

use crate::domain::ledger::PaymentLedger;
use crate::domain::payment::QueuedPayment;
use crate::domain::payment_gateway::PaymentGateway;
use crate::domain::queue::PaymentQueueStore;
use crate::use_cases::process_payment::ProcessPaymentUseCase;

/// Reclaim abandoned leases roughly every N polling cycles; at the 100ms idle
/// backoff this is on the order of every ten seconds.
const STALE_LEASE_SWEEP_CYCLES: u64 = 100;

#[derive(Debug, Clone)]
pub struct WorkerSettings {
	pub batch_size:    i64,
	/// Ceiling after which a failing message is acked (dropped) instead of
	/// released for another attempt.
	pub max_retries:   i32,
	pub idle_backoff:  Duration,
	pub error_backoff: Duration,
	pub lease_timeout: time::Duration,
}

impl Default for WorkerSettings {
	fn default() -> Self {
		Self {
			batch_size:    30,
			max_retries:   3,
			idle_backoff:  Duration::from_millis(100),
			error_backoff: Duration::from_millis(50),
			lease_timeout: time::Duration::seconds(60),
		}
	}
}

/// One polling loop of the worker pool. Reserves a batch, drives every
/// reserved message to a terminal action, then immediately reserves again —
/// greedy draining while work is available, short backoffs otherwise. A
/// second reservation never starts before the current batch fully settles.
pub async fn payment_worker<Q, G, L>(
	queue: Q,
	orchestrator: ProcessPaymentUseCase<G, L>,
	consumer_name: String,
	settings: WorkerSettings,
) where
	Q: PaymentQueueStore + Clone,
	G: PaymentGateway + Clone,
	L: PaymentLedger + Clone,
{
	info!("Payment worker '{consumer_name}' started");
	let mut cycles: u64 = 0;

	loop {
		cycles += 1;
		if cycles % STALE_LEASE_SWEEP_CYCLES == 0 {
			match queue.release_stale_leases(settings.lease_timeout).await {
				Ok(0) => {}
				Ok(released) => {
					warn!("Worker '{consumer_name}' reclaimed {released} stale leases")
				}
				Err(e) => error!("Failed to reclaim stale leases: {e}"),
			}
		}

		match queue
			.reserve_batch(settings.batch_size, &consumer_name)
			.await
		{
			Ok(batch) if batch.is_empty() => {
				sleep(settings.idle_backoff).await;
			}
			Ok(batch) => {
				drain_batch(&queue, &orchestrator, batch, settings.max_retries)
					.await;
			}
			Err(e) => {
				error!("Worker '{consumer_name}' failed to reserve a batch: {e}");
				sleep(settings.error_backoff).await;
			}
		}
	}
}

/// Dispatches every reserved message concurrently and waits for all of them
/// to reach a terminal action, bounding the in-flight work per loop.
pub async fn drain_batch<Q, G, L>(
	queue: &Q,
	orchestrator: &ProcessPaymentUseCase<G, L>,
	batch: Vec<QueuedPayment>,
	max_retries: i32,
) where
	Q: PaymentQueueStore,
	G: PaymentGateway,
	L: PaymentLedger,
{
	let settlements = batch
		.into_iter()
		.map(|message| settle_message(queue, orchestrator, message, max_retries));
	join_all(settlements).await;
}

/// Terminal action for one message: ack on success or duplicate, ack-and-drop
/// once retries are exhausted, otherwise release the lease with a bumped
/// retry count. Failures in here never escape to the polling loop.
async fn settle_message<Q, G, L>(
	queue: &Q,
	orchestrator: &ProcessPaymentUseCase<G, L>,
	message: QueuedPayment,
	max_retries: i32,
) where
	Q: PaymentQueueStore,
	G: PaymentGateway,
	L: PaymentLedger,
{
	let QueuedPayment { message_id, record } = message;
	let correlation_id = record.correlation_id;
	let retry_count = record.retry_count;

	match orchestrator.execute(record).await {
		Ok(status) => {
			info!("Payment {correlation_id} settled as {status:?}");
			if let Err(e) = queue.ack(message_id).await {
				error!("Failed to ack message {message_id}: {e}");
			}
		}
		Err(e) if retry_count >= max_retries => {
			warn!(
				"Payment {correlation_id} exhausted its {max_retries} retries \
				 ({e}); dropping the message"
			);
			if let Err(e) = queue.ack(message_id).await {
				error!("Failed to drop message {message_id}: {e}");
			}
		}
		Err(e) => {
			warn!("Payment {correlation_id} failed ({e}); releasing for retry");
			match queue.increment_retry(message_id).await {
				Ok(new_count) => info!(
					"Message {message_id} released, retry count is {new_count}"
				),
				Err(e) => {
					error!("Failed to release message {message_id}: {e}")
				}
			}
		}
	}
}
