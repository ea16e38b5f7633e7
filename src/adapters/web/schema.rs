use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::ledger::PaymentSummary;
use crate::use_cases::dto::PaymentsSummary;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
}

impl PaymentRequest {
	/// Currency units from the wire become exact cents at the boundary.
	pub fn amount_in_cents(&self) -> i64 {
		(self.amount * 100.0).round() as i64
	}
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentResponse {
	pub payment: PaymentRequest,
	pub status:  String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentsSummaryFilter {
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub from: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub to:   Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SummaryData {
	#[serde(rename = "totalRequests")]
	pub total_requests: i64,
	#[serde(rename = "totalAmount")]
	pub total_amount:   f64,
}

impl From<PaymentSummary> for SummaryData {
	fn from(summary: PaymentSummary) -> Self {
		SummaryData {
			total_requests: summary.total_requests,
			total_amount:   summary.total_amount_in_cents as f64 / 100.0,
		}
	}
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentsSummaryResponse {
	pub default:  SummaryData,
	pub fallback: SummaryData,
}

impl From<PaymentsSummary> for PaymentsSummaryResponse {
	fn from(summary: PaymentsSummary) -> Self {
		PaymentsSummaryResponse {
			default:  summary.default.into(),
			fallback: summary.fallback.into(),
		}
	}
}
