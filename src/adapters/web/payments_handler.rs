use actix_web::{HttpResponse, post, web};
use log::{debug, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{PaymentRequest, PaymentResponse};
use crate::use_cases::create_payment::CreatePaymentUseCase;

/// Answers only once the payment is confirmed upstream and in the ledger.
#[post("/payments")]
pub async fn payments(
	payload: web::Json<PaymentRequest>,
	create_payment_use_case: web::Data<CreatePaymentUseCase>,
) -> Result<HttpResponse, ApiError> {
	let request = payload.into_inner();
	let correlation_id = request.correlation_id;

	let result = create_payment_use_case
		.execute(request.into())
		.await
		.inspect_err(|e| warn!("Payment {correlation_id} not processed: {e}"))?;

	debug!(
		"Payment {correlation_id} processed by {} processor (replayed: {})",
		result.processor, result.replayed
	);
	Ok(HttpResponse::Ok().json(PaymentResponse::of(correlation_id, &result)))
}
