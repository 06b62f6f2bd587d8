use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use circuitbreaker_rs::{BreakerError, CircuitBreaker, DefaultPolicy, State};
use log::{info, warn};
use time::OffsetDateTime;

use crate::domain::health_status::{
	HealthStatus, ProcessorHealth, SubmissionOutcome,
};
use crate::domain::payment_processor::{HealthReport, SubmissionError};
use crate::domain::processor::ProcessorId;
use crate::infrastructure::config::settings::Config;

type ProcessorBreaker = CircuitBreaker<DefaultPolicy, SubmissionError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthPolicy {
	/// Consecutive failed submissions that flip a processor to failing.
	pub failure_threshold:    u32,
	/// How long a failing processor is skipped before one request may try it.
	pub retry_cooldown:       Duration,
	/// Extra latency the default processor may have over the fallback before
	/// the fallback is preferred.
	pub latency_tolerance_ms: u64,
}

impl Default for HealthPolicy {
	fn default() -> Self {
		Self {
			failure_threshold:    1,
			retry_cooldown:       Duration::from_secs(1),
			latency_tolerance_ms: 100,
		}
	}
}

impl From<&Config> for HealthPolicy {
	fn from(config: &Config) -> Self {
		Self {
			failure_threshold:    config.health_failure_threshold.max(1),
			retry_cooldown:       config.optimistic_retry_cooldown(),
			latency_tolerance_ms: config.latency_tolerance_ms,
		}
	}
}

impl HealthPolicy {
	fn breaker(&self) -> ProcessorBreaker {
		CircuitBreaker::<DefaultPolicy, SubmissionError>::builder()
			.consecutive_failures(u64::from(self.failure_threshold.max(1)))
			// Only a run of failures trips the breaker, never the error rate.
			.min_throughput(u64::MAX)
			.cooldown(self.retry_cooldown)
			// The call that ends the cooldown is the only one let through.
			.probe_interval(0)
			.consecutive_successes(1)
			.build()
	}
}

/// Processors to try for one payment, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteCandidates {
	pub primary:   ProcessorId,
	pub secondary: ProcessorId,
}

impl RouteCandidates {
	fn starting_with(primary: ProcessorId) -> Self {
		Self {
			primary,
			secondary: primary.other(),
		}
	}

	pub fn in_order(&self) -> [ProcessorId; 2] {
		[self.primary, self.secondary]
	}
}

#[derive(Debug, Clone, Copy, Default)]
struct ProcessorStats {
	min_response_time_ms: u64,
	last_checked_at:      Option<OffsetDateTime>,
}

/// Live health of both processors, shared by every handler of one instance.
///
/// Each processor sits behind its own circuit breaker. A closed breaker is a
/// healthy processor. The breaker opens after `failure_threshold` failed
/// submissions in a row or on a failing health report, and once
/// `retry_cooldown` has passed it lets a single submission through to find
/// out whether the processor recovered.
#[derive(Clone)]
pub struct ProcessorHealthTracker {
	breakers:             [ProcessorBreaker; 2],
	stats:                Arc<Mutex<[ProcessorStats; 2]>>,
	latency_tolerance_ms: u64,
}

impl ProcessorHealthTracker {
	pub fn new(policy: HealthPolicy) -> Self {
		Self {
			breakers:             [policy.breaker(), policy.breaker()],
			stats:                Arc::new(Mutex::new(Default::default())),
			latency_tolerance_ms: policy.latency_tolerance_ms,
		}
	}

	pub fn status(&self, processor: ProcessorId) -> HealthStatus {
		match self.breaker(processor).current_state() {
			State::Closed => HealthStatus::Healthy,
			State::Open | State::HalfOpen => HealthStatus::Failing,
		}
	}

	pub fn is_healthy(&self, processor: ProcessorId) -> bool {
		self.status(processor).is_healthy()
	}

	/// Runs one submission through the processor's breaker.
	///
	/// Returns `None` when the breaker turned the submission away without
	/// calling the processor. A refused payment still proves the processor
	/// answers, so it never counts against its health.
	pub async fn attempt<F, Fut>(
		&self,
		processor: ProcessorId,
		submit: F,
	) -> Option<Result<(), SubmissionError>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<(), SubmissionError>>,
	{
		let was_healthy = self.is_healthy(processor);
		let started = Instant::now();

		let outcome = self
			.breaker(processor)
			.call_async(move || async move {
				match submit().await {
					Err(SubmissionError::Rejected { status }) => {
						Ok(Err(SubmissionError::Rejected { status }))
					}
					other => other.map(Ok),
				}
			})
			.await;

		match outcome {
			Ok(result) => {
				if result.is_ok() {
					self.record_latency(processor, started.elapsed());
				}
				if !was_healthy {
					info!("{processor} processor recovered");
				}
				Some(result)
			}
			Err(BreakerError::Open) => None,
			Err(BreakerError::Operation(e)) => {
				self.warn_if_tripped(processor, was_healthy);
				Some(Err(e))
			}
			Err(BreakerError::Internal(e)) => {
				warn!("{processor} processor circuit breaker failed: {e}");
				Some(Err(SubmissionError::Unavailable {
					reason: e.to_string(),
				}))
			}
		}
	}

	/// Feeds back a submission made without going through [`Self::attempt`].
	pub fn observe(
		&self,
		processor: ProcessorId,
		outcome: SubmissionOutcome,
		latency: Duration,
	) {
		let breaker = self.breaker(processor);

		match outcome {
			SubmissionOutcome::Success => {
				self.record_latency(processor, latency);
				if breaker.force_closed() {
					info!("{processor} processor recovered");
				} else {
					let _ = breaker.call(|| Ok(()));
				}
			}
			SubmissionOutcome::TimeoutOrError => {
				let was_healthy = self.is_healthy(processor);
				// An open breaker turns this away and simply stays open.
				let _ = breaker.call(|| Err::<(), _>(SubmissionError::Timeout));
				self.warn_if_tripped(processor, was_healthy);
			}
		}
	}

	/// Applies an active health check. `None` means the check itself failed.
	pub fn apply_probe(
		&self,
		processor: ProcessorId,
		report: Option<HealthReport>,
	) -> ProcessorHealth {
		{
			let mut stats = self.lock();
			let stats = &mut stats[processor.index()];
			stats.last_checked_at = Some(OffsetDateTime::now_utc());
			if let Some(report) = report {
				stats.min_response_time_ms = report.min_response_time_ms;
			}
		}

		let breaker = self.breaker(processor);
		match report {
			Some(HealthReport { failing: false, .. }) => {
				if breaker.force_closed() {
					info!("{processor} processor reported healthy again");
				}
			}
			_ => {
				if breaker.force_open() {
					warn!("{processor} processor marked as failing by its health check");
				}
			}
		}

		self.snapshot(processor)
	}

	pub fn snapshot(&self, processor: ProcessorId) -> ProcessorHealth {
		let stats = self.lock()[processor.index()];
		ProcessorHealth {
			processor,
			failing: !self.is_healthy(processor),
			min_response_time_ms: stats.min_response_time_ms,
			last_checked_at: stats.last_checked_at,
		}
	}

	/// Picks the processor order for the next payment.
	///
	/// Default leads unless both are healthy and it is slower than the
	/// fallback beyond the tolerance. A failing default keeps its place: its
	/// breaker skips it until the cooldown ends and then lets one payment try.
	pub fn select(&self) -> RouteCandidates {
		if !self.is_healthy(ProcessorId::Default) ||
			!self.is_healthy(ProcessorId::Fallback)
		{
			return RouteCandidates::starting_with(ProcessorId::Default);
		}

		let stats = self.lock();
		let default = stats[ProcessorId::Default.index()].min_response_time_ms;
		let fallback = stats[ProcessorId::Fallback.index()].min_response_time_ms;

		if default > fallback.saturating_add(self.latency_tolerance_ms) {
			RouteCandidates::starting_with(ProcessorId::Fallback)
		} else {
			RouteCandidates::starting_with(ProcessorId::Default)
		}
	}

	fn record_latency(&self, processor: ProcessorId, latency: Duration) {
		let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
		let mut stats = self.lock();
		let stats = &mut stats[processor.index()];
		if stats.min_response_time_ms == 0 || latency_ms < stats.min_response_time_ms {
			stats.min_response_time_ms = latency_ms;
		}
	}

	fn warn_if_tripped(&self, processor: ProcessorId, was_healthy: bool) {
		if was_healthy && !self.is_healthy(processor) {
			warn!("{processor} processor marked as failing after repeated failures");
		}
	}

	fn breaker(&self, processor: ProcessorId) -> &ProcessorBreaker {
		&self.breakers[processor.index()]
	}

	fn lock(&self) -> MutexGuard<'_, [ProcessorStats; 2]> {
		self.stats.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Default for ProcessorHealthTracker {
	fn default() -> Self {
		Self::new(HealthPolicy::default())
	}
}
