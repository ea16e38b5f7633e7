use async_trait::async_trait;
use time::Duration;

use crate::domain::error::StoreError;
use crate::domain::payment::{PaymentRecord, QueuedPayment};

/// Durable queue of payment intents. Rows are owned exclusively by the store;
/// workers hold only a transient lease expressed by `status = PROCESSING` plus
/// their consumer name. The atomic reservation in `reserve_batch` is the sole
/// mechanism preventing duplicate delivery.
#[async_trait]
pub trait PaymentQueueStore: Send + Sync + 'static {
	/// Insert a new `PENDING` row. A second enqueue with the same correlation
	/// id must fail with [`StoreError::DuplicateCorrelationId`], never create
	/// a second row.
	async fn enqueue(&self, record: &PaymentRecord) -> Result<(), StoreError>;

	/// Atomically claim up to `max_size` pending rows, oldest first, skipping
	/// rows locked by a concurrent reservation. Two concurrent callers never
	/// receive the same row, and neither blocks on the other.
	async fn reserve_batch(
		&self,
		max_size: i64,
		consumer_name: &str,
	) -> Result<Vec<QueuedPayment>, StoreError>;

	/// Permanently remove a row, terminal for success, duplicates and
	/// exhausted retries alike.
	async fn ack(&self, message_id: i64) -> Result<(), StoreError>;

	/// Release the lease back to `PENDING` and bump the retry counter,
	/// returning the new count.
	async fn increment_retry(&self, message_id: i64) -> Result<i32, StoreError>;

	/// Reclaim leases held longer than `older_than`, e.g. after a worker
	/// crashed mid-batch. Returns the number of rows released.
	async fn release_stale_leases(
		&self,
		older_than: Duration,
	) -> Result<u64, StoreError>;

	/// Drop every queued row. Test/ops surface only.
	async fn purge(&self) -> Result<(), StoreError>;
}
