use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, error, info, warn};
use time::OffsetDateTime;
use tokio::time::timeout;

use crate::domain::health_status::SubmissionOutcome;
use crate::domain::ledger::{Ledger, LedgerError};
use crate::domain::payment::{Payment, PaymentRecord};
use crate::domain::payment_processor::{PaymentProcessorClient, SubmissionError};
use crate::domain::payment_router::{PaymentRouter, RouterError, RouterResult};
use crate::domain::processor::ProcessorId;
use crate::infrastructure::routing::processor_health_tracker::ProcessorHealthTracker;

/// Sends a payment to the preferred processor, falls back to the other one
/// once, and records the confirmed payment before reporting success.
#[derive(Clone)]
pub struct FailoverPaymentRouter {
	client:             Arc<dyn PaymentProcessorClient>,
	ledger:             Arc<dyn Ledger>,
	health:             ProcessorHealthTracker,
	submission_timeout: Duration,
}

impl FailoverPaymentRouter {
	pub fn new(
		client: Arc<dyn PaymentProcessorClient>,
		ledger: Arc<dyn Ledger>,
		health: ProcessorHealthTracker,
		submission_timeout: Duration,
	) -> Self {
		Self {
			client,
			ledger,
			health,
			submission_timeout,
		}
	}

	pub fn health(&self) -> &ProcessorHealthTracker {
		&self.health
	}

	async fn submit(
		&self,
		processor: ProcessorId,
		payment: &Payment,
		requested_at: OffsetDateTime,
	) -> Result<(), SubmissionError> {
		timeout(
			self.submission_timeout,
			self.client.submit(processor, payment, requested_at),
		)
		.await
		.unwrap_or(Err(SubmissionError::Timeout))
	}

	/// `None` when the processor failed and the next one should be tried.
	async fn conclude(
		&self,
		payment: &Payment,
		processor: ProcessorId,
		requested_at: OffsetDateTime,
		result: Result<(), SubmissionError>,
	) -> Option<Result<RouterResult, RouterError>> {
		match result {
			Ok(()) => Some(self.record(payment, processor, requested_at).await),
			Err(SubmissionError::Rejected { status }) => {
				warn!(
					"Payment {} rejected by {processor} processor with status \
					 {status}",
					payment.correlation_id
				);
				Some(Err(RouterError::PaymentRejected { processor, status }))
			}
			Err(e) => {
				warn!(
					"Payment {} failed on {processor} processor: {e}",
					payment.correlation_id
				);
				None
			}
		}
	}

	async fn record(
		&self,
		payment: &Payment,
		processor: ProcessorId,
		confirmed_at: OffsetDateTime,
	) -> Result<RouterResult, RouterError> {
		let record = PaymentRecord::of(payment, processor, confirmed_at);

		match self.ledger.append(record).await {
			Ok(()) => Ok(RouterResult {
				processor,
				confirmed_at,
				replayed: false,
			}),
			Err(LedgerError::Duplicate {
				correlation_id,
				processor: recorded_by,
			}) => {
				info!(
					"Payment {correlation_id} was already recorded by the \
					 {recorded_by} processor, replaying"
				);
				Ok(RouterResult {
					processor: recorded_by,
					confirmed_at,
					replayed: true,
				})
			}
			Err(source) => {
				error!(
					"Payment {} confirmed by {processor} processor but could not \
					 be recorded: {source}",
					payment.correlation_id
				);
				Err(RouterError::LedgerWrite { source })
			}
		}
	}
}

#[async_trait]
impl PaymentRouter for FailoverPaymentRouter {
	async fn route(&self, payment: &Payment) -> Result<RouterResult, RouterError> {
		let candidates = self.health.select();
		debug!(
			"Routing payment {} to {} processor first",
			payment.correlation_id, candidates.primary
		);

		let mut skipped = Vec::with_capacity(2);
		for processor in candidates.in_order() {
			let requested_at = OffsetDateTime::now_utc();
			let attempt = self
				.health
				.attempt(processor, || self.submit(processor, payment, requested_at))
				.await;

			let Some(result) = attempt else {
				debug!("Skipping {processor} processor while its circuit is open");
				skipped.push(processor);
				continue;
			};
			if let Some(routed) =
				self.conclude(payment, processor, requested_at, result).await
			{
				return routed;
			}
		}

		// A payment always reaches at least one processor, even when every
		// circuit is open.
		for processor in skipped {
			let requested_at = OffsetDateTime::now_utc();
			let started = Instant::now();
			let result = self.submit(processor, payment, requested_at).await;

			match &result {
				Ok(()) => self.health.observe(
					processor,
					SubmissionOutcome::Success,
					started.elapsed(),
				),
				Err(SubmissionError::Rejected { .. }) => {}
				Err(_) => self.health.observe(
					processor,
					SubmissionOutcome::TimeoutOrError,
					started.elapsed(),
				),
			}
			if let Some(routed) =
				self.conclude(payment, processor, requested_at, result).await
			{
				return routed;
			}
		}

		error!(
			"Payment {} could not be processed by any processor",
			payment.correlation_id
		);
		Err(RouterError::BothProcessorsUnavailable)
	}
}
