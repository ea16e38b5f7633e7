//! In-memory fakes for the storage and gateway seams, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::domain::error::StoreError;
use crate::domain::gateway::GatewayType;
use crate::domain::health::GatewayHealth;
use crate::domain::health_store::HealthStore;
use crate::domain::ledger::{PaymentLedger, PaymentSummary};
use crate::domain::payment::{PaymentRecord, QueuedPayment};
use crate::domain::payment_gateway::{GatewayReply, PaymentGateway};
use crate::domain::queue::PaymentQueueStore;

/// Gateway double that plays back a scripted sequence of replies, then keeps
/// answering with the last one.
#[derive(Clone)]
pub struct ScriptedGateway {
	replies:     Arc<Mutex<VecDeque<GatewayReply>>>,
	last:        Arc<Mutex<GatewayReply>>,
	contingency: Arc<AtomicBool>,
}

impl ScriptedGateway {
	pub fn with_replies(replies: Vec<GatewayReply>) -> Self {
		let last = replies.last().cloned().unwrap_or(GatewayReply::Failed);
		Self {
			replies:     Arc::new(Mutex::new(replies.into())),
			last:        Arc::new(Mutex::new(last)),
			contingency: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn contingency_enabled(&self) -> bool {
		self.contingency.load(Ordering::Relaxed)
	}
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
	async fn process(&self, _record: &PaymentRecord) -> GatewayReply {
		match self.replies.lock().unwrap().pop_front() {
			Some(reply) => reply,
			None => self.last.lock().unwrap().clone(),
		}
	}

	fn set_contingency(&self, enabled: bool) {
		self.contingency.store(enabled, Ordering::Relaxed);
	}
}

#[derive(Clone, Copy)]
pub enum LedgerMode {
	Accepting,
	RejectingDuplicates,
	Failing,
}

/// Ledger double that records every saved row.
#[derive(Clone)]
pub struct RecordingLedger {
	saved: Arc<Mutex<Vec<PaymentRecord>>>,
	mode:  Arc<Mutex<LedgerMode>>,
}

impl RecordingLedger {
	pub fn new() -> Self {
		Self {
			saved: Arc::new(Mutex::new(Vec::new())),
			mode:  Arc::new(Mutex::new(LedgerMode::Accepting)),
		}
	}

	pub fn set_mode(&self, mode: LedgerMode) {
		*self.mode.lock().unwrap() = mode;
	}

	pub fn saved(&self) -> Vec<PaymentRecord> {
		self.saved.lock().unwrap().clone()
	}
}

impl Default for RecordingLedger {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PaymentLedger for RecordingLedger {
	async fn save(&self, record: &PaymentRecord) -> Result<(), StoreError> {
		match *self.mode.lock().unwrap() {
			LedgerMode::Accepting => {
				self.saved.lock().unwrap().push(record.clone());
				Ok(())
			}
			LedgerMode::RejectingDuplicates => {
				Err(StoreError::DuplicateCorrelationId)
			}
			LedgerMode::Failing => Err(StoreError::backend("ledger unavailable")),
		}
	}

	async fn summary(
		&self,
		_from: Option<OffsetDateTime>,
		_to: Option<OffsetDateTime>,
	) -> Result<HashMap<GatewayType, PaymentSummary>, StoreError> {
		let mut per_gateway: HashMap<GatewayType, PaymentSummary> = HashMap::new();
		for record in self.saved.lock().unwrap().iter() {
			if let Some(gateway) = record.gateway_type {
				let entry = per_gateway.entry(gateway).or_default();
				entry.total_requests += 1;
				entry.total_amount_in_cents += record.amount_in_cents;
			}
		}
		Ok(per_gateway)
	}

	async fn purge(&self) -> Result<(), StoreError> {
		self.saved.lock().unwrap().clear();
		Ok(())
	}
}

struct QueueRow {
	message_id: i64,
	record:     PaymentRecord,
	pending:    bool,
}

/// Queue double with the same lease semantics as the durable store, minus the
/// durability.
#[derive(Clone)]
pub struct InMemoryQueue {
	rows:    Arc<Mutex<Vec<QueueRow>>>,
	acked:   Arc<Mutex<Vec<i64>>>,
	retried: Arc<Mutex<Vec<i64>>>,
	next_id: Arc<AtomicI64>,
}

impl InMemoryQueue {
	pub fn new() -> Self {
		Self {
			rows:    Arc::new(Mutex::new(Vec::new())),
			acked:   Arc::new(Mutex::new(Vec::new())),
			retried: Arc::new(Mutex::new(Vec::new())),
			next_id: Arc::new(AtomicI64::new(1)),
		}
	}

	pub fn acked(&self) -> Vec<i64> {
		self.acked.lock().unwrap().clone()
	}

	pub fn retried(&self) -> Vec<i64> {
		self.retried.lock().unwrap().clone()
	}

	pub fn pending_count(&self) -> usize {
		self.rows.lock().unwrap().iter().filter(|r| r.pending).count()
	}
}

impl Default for InMemoryQueue {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PaymentQueueStore for InMemoryQueue {
	async fn enqueue(&self, record: &PaymentRecord) -> Result<(), StoreError> {
		let mut rows = self.rows.lock().unwrap();
		if rows
			.iter()
			.any(|r| r.record.correlation_id == record.correlation_id)
		{
			return Err(StoreError::DuplicateCorrelationId);
		}
		let message_id = self.next_id.fetch_add(1, Ordering::Relaxed);
		rows.push(QueueRow {
			message_id,
			record: record.clone(),
			pending: true,
		});
		Ok(())
	}

	async fn reserve_batch(
		&self,
		max_size: i64,
		_consumer_name: &str,
	) -> Result<Vec<QueuedPayment>, StoreError> {
		let mut rows = self.rows.lock().unwrap();
		let mut reserved = Vec::new();
		for row in rows.iter_mut().filter(|r| r.pending) {
			if reserved.len() as i64 >= max_size {
				break;
			}
			row.pending = false;
			reserved.push(QueuedPayment {
				message_id: row.message_id,
				record:     row.record.clone(),
			});
		}
		Ok(reserved)
	}

	async fn ack(&self, message_id: i64) -> Result<(), StoreError> {
		self.rows
			.lock()
			.unwrap()
			.retain(|r| r.message_id != message_id);
		self.acked.lock().unwrap().push(message_id);
		Ok(())
	}

	async fn increment_retry(&self, message_id: i64) -> Result<i32, StoreError> {
		let mut rows = self.rows.lock().unwrap();
		let row = rows
			.iter_mut()
			.find(|r| r.message_id == message_id)
			.ok_or_else(|| StoreError::backend("no such message"))?;
		row.record.retry_count += 1;
		row.pending = true;
		self.retried.lock().unwrap().push(message_id);
		Ok(row.record.retry_count)
	}

	async fn release_stale_leases(
		&self,
		_older_than: Duration,
	) -> Result<u64, StoreError> {
		Ok(0)
	}

	async fn purge(&self) -> Result<(), StoreError> {
		self.rows.lock().unwrap().clear();
		Ok(())
	}
}

/// Health store double backed by a plain map.
#[derive(Clone)]
pub struct InMemoryHealthStore {
	entries: Arc<Mutex<HashMap<GatewayType, GatewayHealth>>>,
}

impl InMemoryHealthStore {
	pub fn new() -> Self {
		Self {
			entries: Arc::new(Mutex::new(HashMap::new())),
		}
	}

	pub fn set(&self, gateway: GatewayType, health: GatewayHealth) {
		self.entries.lock().unwrap().insert(gateway, health);
	}
}

impl Default for InMemoryHealthStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
	async fn get(
		&self,
		gateway: GatewayType,
	) -> Result<Option<GatewayHealth>, StoreError> {
		Ok(self.entries.lock().unwrap().get(&gateway).cloned())
	}

	async fn save(
		&self,
		gateway: GatewayType,
		health: &GatewayHealth,
	) -> Result<(), StoreError> {
		self.entries.lock().unwrap().insert(gateway, health.clone());
		Ok(())
	}
}
