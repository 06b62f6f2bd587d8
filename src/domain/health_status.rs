use time::OffsetDateTime;

use crate::domain::processor::ProcessorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
	Healthy,
	Failing,
}

impl HealthStatus {
	pub fn is_healthy(&self) -> bool {
		matches!(self, HealthStatus::Healthy)
	}
}

/// Result of one submission attempt, as fed back into the health tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
	Success,
	TimeoutOrError,
}

/// Point-in-time view of a processor's health. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorHealth {
	pub processor:            ProcessorId,
	pub failing:              bool,
	pub min_response_time_ms: u64,
	pub last_checked_at:      Option<OffsetDateTime>,
}
