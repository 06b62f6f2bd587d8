use std::sync::Arc;

use log::{debug, warn};

use crate::domain::health_status::ProcessorHealth;
use crate::domain::payment_processor::{PaymentProcessorClient, SubmissionError};
use crate::domain::processor::ProcessorId;
use crate::infrastructure::routing::processor_health_tracker::ProcessorHealthTracker;

/// Actively probes one processor and feeds the answer into the tracker.
#[derive(Clone)]
pub struct HealthCheckUseCase {
	client:  Arc<dyn PaymentProcessorClient>,
	tracker: ProcessorHealthTracker,
}

impl HealthCheckUseCase {
	pub fn new(
		client: Arc<dyn PaymentProcessorClient>,
		tracker: ProcessorHealthTracker,
	) -> Self {
		Self { client, tracker }
	}

	/// Never fails: an unreachable processor is recorded as failing. A
	/// throttled health check carries no information and leaves the tracker
	/// as it was.
	pub async fn execute(&self, processor: ProcessorId) -> ProcessorHealth {
		let report = match self.client.probe(processor).await {
			Ok(report) => Some(report),
			Err(SubmissionError::RateLimited) => {
				debug!("Health check for {processor} processor was rate limited");
				return self.tracker.snapshot(processor);
			}
			Err(e) => {
				warn!("Health check for {processor} processor failed: {e}");
				None
			}
		};

		let health = self.tracker.apply_probe(processor, report);
		debug!(
			"{processor} processor health: failing={}, min_response_time={}",
			health.failing, health.min_response_time_ms
		);
		health
	}
}
