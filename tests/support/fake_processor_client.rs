use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rinha_router::domain::payment::Payment;
use rinha_router::domain::payment_processor::{
	HealthReport, PaymentProcessorClient, SubmissionError,
};
use rinha_router::domain::processor::ProcessorId;
use time::OffsetDateTime;
use tokio::time::sleep;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
	Succeed,
	Fail,
	Hang,
	Reject(u16),
}

/// In-process stand-in for both payment processors.
#[derive(Clone)]
pub struct FakeProcessorClient {
	behaviors:    Arc<Mutex<[Behavior; 2]>>,
	health:       Arc<Mutex<[Option<HealthReport>; 2]>>,
	rate_limited: Arc<Mutex<[bool; 2]>>,
	calls:        Arc<Mutex<Vec<(ProcessorId, Uuid)>>>,
}

impl FakeProcessorClient {
	pub fn new(default: Behavior, fallback: Behavior) -> Self {
		Self {
			behaviors:    Arc::new(Mutex::new([default, fallback])),
			health:       Arc::new(Mutex::new([None, None])),
			rate_limited: Arc::new(Mutex::new([false, false])),
			calls:        Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn set_behavior(&self, processor: ProcessorId, behavior: Behavior) {
		self.behaviors.lock().unwrap()[processor.index()] = behavior;
	}

	pub fn set_health(&self, processor: ProcessorId, report: Option<HealthReport>) {
		self.health.lock().unwrap()[processor.index()] = report;
	}

	pub fn set_rate_limited(&self, processor: ProcessorId, rate_limited: bool) {
		self.rate_limited.lock().unwrap()[processor.index()] = rate_limited;
	}

	pub fn calls(&self) -> Vec<(ProcessorId, Uuid)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn calls_to(&self, processor: ProcessorId) -> usize {
		self.calls
			.lock()
			.unwrap()
			.iter()
			.filter(|(called, _)| *called == processor)
			.count()
	}
}

#[async_trait]
impl PaymentProcessorClient for FakeProcessorClient {
	async fn submit(
		&self,
		processor: ProcessorId,
		payment: &Payment,
		_requested_at: OffsetDateTime,
	) -> Result<(), SubmissionError> {
		self.calls
			.lock()
			.unwrap()
			.push((processor, payment.correlation_id));
		let behavior = self.behaviors.lock().unwrap()[processor.index()];

		match behavior {
			Behavior::Succeed => Ok(()),
			Behavior::Fail => Err(SubmissionError::Unavailable {
				reason: "HTTP 500".to_string(),
			}),
			Behavior::Hang => {
				sleep(Duration::from_secs(60)).await;
				Ok(())
			}
			Behavior::Reject(status) => Err(SubmissionError::Rejected { status }),
		}
	}

	async fn probe(
		&self,
		processor: ProcessorId,
	) -> Result<HealthReport, SubmissionError> {
		if self.rate_limited.lock().unwrap()[processor.index()] {
			return Err(SubmissionError::RateLimited);
		}
		self.health.lock().unwrap()[processor.index()].ok_or(
			SubmissionError::Unavailable {
				reason: "connection refused".to_string(),
			},
		)
	}
}
