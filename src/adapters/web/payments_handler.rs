use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::{error, info, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{PaymentRequest, PaymentResponse};
use crate::domain::error::StoreError;
use crate::infrastructure::persistence::postgres_payment_store::PostgresPaymentStore;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::dto::CreatePaymentCommand;

#[post("/payments")]
pub async fn payments(
	payload: web::Json<PaymentRequest>,
	create_payment_use_case: web::Data<CreatePaymentUseCase<PostgresPaymentStore>>,
) -> impl Responder {
	let command = CreatePaymentCommand {
		correlation_id:  payload.correlation_id,
		amount_in_cents: payload.amount_in_cents(),
	};

	match create_payment_use_case.execute(command).await {
		Ok(_) => {
			info!("Payment received and queued: {}", payload.correlation_id);
			HttpResponse::Ok().json(PaymentResponse {
				payment: payload.0,
				status:  "queued".to_string(),
			})
		}
		Err(StoreError::DuplicateCorrelationId) => {
			warn!(
				"Rejected duplicate payment request: {}",
				payload.correlation_id
			);
			ApiError::DuplicatedPaymentError.error_response()
		}
		Err(e) => {
			error!("Error enqueueing payment: {e}");
			ApiError::InternalServerError.error_response()
		}
	}
}
