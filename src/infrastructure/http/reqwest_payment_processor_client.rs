use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::payment::Payment;
use crate::domain::payment_processor::{
	HealthReport, PaymentProcessorClient, SubmissionError,
};
use crate::domain::processor::ProcessorId;
use crate::infrastructure::config::settings::Config;

const TOKEN_HEADER: &str = "X-Rinha-Token";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProcessorRequest {
	pub correlation_id: Uuid,
	#[serde(with = "rust_decimal::serde::float")]
	pub amount:         Decimal,
	#[serde(with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

#[derive(Clone)]
pub struct ReqwestPaymentProcessorClient {
	http_client:  Client,
	default_url:  String,
	fallback_url: String,
	token:        Option<String>,
	timeout:      Duration,
}

impl ReqwestPaymentProcessorClient {
	pub fn new(
		http_client: Client,
		default_url: impl Into<String>,
		fallback_url: impl Into<String>,
		timeout: Duration,
	) -> Self {
		Self {
			http_client,
			default_url: default_url.into().trim_end_matches('/').to_string(),
			fallback_url: fallback_url.into().trim_end_matches('/').to_string(),
			token: None,
			timeout,
		}
	}

	pub fn from_config(http_client: Client, config: &Config) -> Self {
		Self::new(
			http_client,
			config.default_payment_processor_url.as_str(),
			config.fallback_payment_processor_url.as_str(),
			config.processor_timeout(),
		)
		.with_token(config.processor_token.clone())
	}

	pub fn with_token(mut self, token: Option<String>) -> Self {
		self.token = token;
		self
	}

	fn base_url(&self, processor: ProcessorId) -> &str {
		match processor {
			ProcessorId::Default => &self.default_url,
			ProcessorId::Fallback => &self.fallback_url,
		}
	}

	fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
		match &self.token {
			Some(token) => request.header(TOKEN_HEADER, token),
			None => request,
		}
	}
}

fn submission_error(e: reqwest::Error) -> SubmissionError {
	if e.is_timeout() {
		SubmissionError::Timeout
	} else {
		SubmissionError::Unavailable {
			reason: e.to_string(),
		}
	}
}

/// 5xx and 429 mean "try elsewhere"; any other 4xx is about the payment.
fn is_retryable(status: StatusCode) -> bool {
	status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl PaymentProcessorClient for ReqwestPaymentProcessorClient {
	async fn submit(
		&self,
		processor: ProcessorId,
		payment: &Payment,
		requested_at: OffsetDateTime,
	) -> Result<(), SubmissionError> {
		let body = PaymentProcessorRequest {
			correlation_id: payment.correlation_id,
			amount: payment.amount,
			requested_at,
		};

		let response = self
			.authorized(
				self.http_client
					.post(format!("{}/payments", self.base_url(processor)))
					.timeout(self.timeout)
					.json(&body),
			)
			.send()
			.await
			.map_err(submission_error)?;

		let status = response.status();
		if status.is_success() {
			debug!(
				"Payment {} accepted by {processor} processor",
				payment.correlation_id
			);
			Ok(())
		} else if is_retryable(status) {
			Err(SubmissionError::Unavailable {
				reason: format!("status {status}"),
			})
		} else {
			Err(SubmissionError::Rejected {
				status: status.as_u16(),
			})
		}
	}

	async fn probe(
		&self,
		processor: ProcessorId,
	) -> Result<HealthReport, SubmissionError> {
		let response = self
			.authorized(
				self.http_client
					.get(format!(
						"{}/payments/service-health",
						self.base_url(processor)
					))
					.timeout(self.timeout),
			)
			.send()
			.await
			.map_err(submission_error)?;

		let status = response.status();
		if status == StatusCode::TOO_MANY_REQUESTS {
			return Err(SubmissionError::RateLimited);
		}
		if !status.is_success() {
			return Err(SubmissionError::Unavailable {
				reason: format!("health check returned status {status}"),
			});
		}

		response
			.json::<HealthReport>()
			.await
			.map_err(submission_error)
	}
}
