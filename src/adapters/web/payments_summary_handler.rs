use actix_web::{HttpResponse, get, web};
use log::error;

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::PaymentsSummaryFilter;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;

#[get("/payments-summary")]
pub async fn payments_summary(
	filter: web::Query<PaymentsSummaryFilter>,
	get_payment_summary_use_case: web::Data<GetPaymentSummaryUseCase>,
) -> Result<HttpResponse, ApiError> {
	let summary = get_payment_summary_use_case
		.execute(filter.into_inner().into())
		.await
		.map_err(|e| {
			error!("Error reading payments summary: {e}");
			ApiError::LedgerReadError
		})?;

	Ok(HttpResponse::Ok().json(summary))
}
