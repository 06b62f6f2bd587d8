use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::payment::Payment;
use crate::domain::processor::ProcessorId;

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum SubmissionError {
	#[display("processor did not answer in time")]
	Timeout,
	#[display("processor unavailable: {reason}")]
	Unavailable { reason: String },
	#[display("processor refused the payment with status {status}")]
	Rejected { status: u16 },
	/// The processor throttled the request. Says nothing about its health.
	#[display("processor is rate limiting requests")]
	RateLimited,
}

/// Body of `GET /payments/service-health`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HealthReport {
	pub failing:              bool,
	#[serde(rename = "minResponseTime")]
	pub min_response_time_ms: u64,
}

#[async_trait]
pub trait PaymentProcessorClient: Send + Sync + 'static {
	async fn submit(
		&self,
		processor: ProcessorId,
		payment: &Payment,
		requested_at: OffsetDateTime,
	) -> Result<(), SubmissionError>;

	async fn probe(
		&self,
		processor: ProcessorId,
	) -> Result<HealthReport, SubmissionError>;
}
