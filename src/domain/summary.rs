use std::ops::Bound;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::processor::ProcessorId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorSummary {
	pub total_requests: u64,
	#[serde(with = "rust_decimal::serde::str")]
	pub total_amount:   Decimal,
}

impl ProcessorSummary {
	/// Totals with one more payment of `amount`, or `None` when either total
	/// would leave its range.
	pub fn checked_add(&self, amount: Decimal) -> Option<Self> {
		Some(Self {
			total_requests: self.total_requests.checked_add(1)?,
			total_amount:   self.total_amount.checked_add(amount)?,
		})
	}

	/// Folds a subset of already recorded totals in. Such a subset never sums
	/// past the recorded totals, so saturation only guards the arithmetic.
	pub fn merge(&mut self, other: &ProcessorSummary) {
		self.total_requests = self.total_requests.saturating_add(other.total_requests);
		self.total_amount = self.total_amount.saturating_add(other.total_amount);
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentsSummary {
	pub default:  ProcessorSummary,
	pub fallback: ProcessorSummary,
}

impl PaymentsSummary {
	pub fn of_mut(&mut self, processor: ProcessorId) -> &mut ProcessorSummary {
		match processor {
			ProcessorId::Default => &mut self.default,
			ProcessorId::Fallback => &mut self.fallback,
		}
	}
}

/// Inclusive `[from, to]` window over `processed_at`. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRange {
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub from: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub to:   Option<OffsetDateTime>,
}

impl SummaryRange {
	pub fn new(from: Option<OffsetDateTime>, to: Option<OffsetDateTime>) -> Self {
		Self { from, to }
	}

	pub fn unbounded() -> Self {
		Self::default()
	}

	pub fn is_unbounded(&self) -> bool {
		self.from.is_none() && self.to.is_none()
	}

	/// True when `from` is after `to`, so nothing can match.
	pub fn is_inverted(&self) -> bool {
		matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
	}

	#[cfg(test)]
	pub fn contains(&self, instant: OffsetDateTime) -> bool {
		self.from.is_none_or(|from| instant >= from) &&
			self.to.is_none_or(|to| instant <= to)
	}

	pub fn bounds(&self) -> (Bound<OffsetDateTime>, Bound<OffsetDateTime>) {
		(
			self.from.map_or(Bound::Unbounded, Bound::Included),
			self.to.map_or(Bound::Unbounded, Bound::Included),
		)
	}
}
