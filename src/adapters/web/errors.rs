use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error};
use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::domain::payment_router::RouterError;
use crate::use_cases::create_payment::CreatePaymentError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
}

#[derive(Debug, Display, Error, PartialEq)]
pub enum ApiError {
	#[display("Request data is invalid.")]
	BadClientDataError,
	#[display("Payment could not be accepted.")]
	UnprocessableEntity,
	#[display("No payment processor is available, try again later.")]
	UpstreamUnavailable,
	#[display("Payment could not be recorded.")]
	LedgerWriteError,
	#[display("Could not read the payments ledger.")]
	LedgerReadError,
	#[display("Service is not accepting payments.")]
	ServiceUnavailable,
	#[display("Internal server error.")]
	InternalServerError,
}

impl ApiError {
	pub fn name(&self) -> String {
		match self {
			ApiError::BadClientDataError => "Bad request".to_string(),
			ApiError::UnprocessableEntity => "Unprocessable Entity".to_string(),
			ApiError::UpstreamUnavailable | ApiError::ServiceUnavailable => {
				"Service Unavailable".to_string()
			}
			ApiError::LedgerWriteError |
			ApiError::LedgerReadError |
			ApiError::InternalServerError => "Internal Server Error".to_string(),
		}
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadClientDataError => StatusCode::BAD_REQUEST,
			ApiError::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
			ApiError::UpstreamUnavailable | ApiError::ServiceUnavailable => {
				StatusCode::SERVICE_UNAVAILABLE
			}
			ApiError::LedgerWriteError |
			ApiError::LedgerReadError |
			ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<CreatePaymentError> for ApiError {
	fn from(error: CreatePaymentError) -> Self {
		match error {
			CreatePaymentError::Invalid(_) => ApiError::UnprocessableEntity,
			CreatePaymentError::Routing(RouterError::PaymentRejected { .. }) => {
				ApiError::UnprocessableEntity
			}
			CreatePaymentError::Routing(RouterError::BothProcessorsUnavailable) => {
				ApiError::UpstreamUnavailable
			}
			CreatePaymentError::Routing(RouterError::LedgerWrite { .. }) => {
				ApiError::LedgerWriteError
			}
			CreatePaymentError::WorkersUnavailable => ApiError::ServiceUnavailable,
		}
	}
}
