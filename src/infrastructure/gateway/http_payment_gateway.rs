use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::gateway::{GatewaySelection, GatewayType};
use crate::domain::payment::PaymentRecord;
use crate::domain::payment_gateway::{GatewayReply, PaymentGateway};
use crate::infrastructure::routing::gateway_selector::GatewaySelector;

/// JSON body POSTed to a gateway. Amounts cross the wire in currency units;
/// the cent-exact value stays internal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayPaymentRequest {
	correlation_id: Uuid,
	amount:         f64,
	#[serde(with = "time::serde::rfc3339")]
	requested_at:   OffsetDateTime,
}

#[derive(Debug, Deserialize)]
struct GatewayPaymentResponse {
	message: String,
}

/// Sends one payment to the gateway chosen by the selector and classifies the
/// response. With contingency mode on, every call is forced to the fallback
/// gateway regardless of health.
#[derive(Clone)]
pub struct HttpPaymentGateway {
	http:        Client,
	selector:    GatewaySelector,
	contingency: Arc<AtomicBool>,
}

impl HttpPaymentGateway {
	pub fn new(http: Client, selector: GatewaySelector) -> Self {
		Self {
			http,
			selector,
			contingency: Arc::new(AtomicBool::new(false)),
		}
	}

	async fn resolve_selection(&self) -> Option<GatewaySelection> {
		if self.contingency.load(Ordering::Relaxed) {
			return Some(self.selector.selection_for(GatewayType::Fallback));
		}
		self.selector.select_best_gateway().await
	}
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
	async fn process(&self, record: &PaymentRecord) -> GatewayReply {
		let selection = match self.resolve_selection().await {
			Some(selection) => selection,
			// Short-circuit: no network call when nothing is routable.
			None => return GatewayReply::Unavailable,
		};

		let body = GatewayPaymentRequest {
			correlation_id: record.correlation_id,
			amount:         record.amount_in_cents as f64 / 100.0,
			requested_at:   record.requested_at,
		};

		let response = match self
			.http
			.post(&selection.endpoint)
			.json(&body)
			.send()
			.await
		{
			Ok(response) => response,
			Err(e) => {
				error!(
					"Failed to send payment {} to the {} gateway: {e}",
					record.correlation_id, selection.gateway
				);
				return GatewayReply::Failed;
			}
		};

		let status = response.status();
		let status_code = i32::from(status.as_u16());

		if status.is_success() {
			let message = response
				.json::<GatewayPaymentResponse>()
				.await
				.map(|r| r.message)
				.unwrap_or_default();
			return GatewayReply::Accepted {
				gateway: selection.gateway,
				status_code,
				message,
			};
		}

		if status == StatusCode::UNPROCESSABLE_ENTITY {
			info!(
				"Gateway {} already holds payment {}",
				selection.gateway, record.correlation_id
			);
			let message = response
				.json::<GatewayPaymentResponse>()
				.await
				.map(|r| r.message)
				.unwrap_or_default();
			return GatewayReply::Duplicate {
				gateway: selection.gateway,
				status_code,
				message,
			};
		}

		warn!(
			"Gateway {} returned status {status} for payment {}",
			selection.gateway, record.correlation_id
		);
		GatewayReply::Failed
	}

	fn set_contingency(&self, enabled: bool) {
		self.contingency.store(enabled, Ordering::Relaxed);
	}
}
