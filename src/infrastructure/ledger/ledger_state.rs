use std::collections::{BTreeMap, HashMap};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::ledger::LedgerError;
use crate::domain::payment::PaymentRecord;
use crate::domain::processor::ProcessorId;
use crate::domain::summary::{PaymentsSummary, ProcessorSummary, SummaryRange};

/// Ledger contents: records in arrival order plus the indexes that keep
/// summaries cheap.
///
/// `totals` answers unbounded summaries in constant time, `timeline` answers
/// ranged ones by walking only the instants inside the range. `recorded`
/// remembers which processor confirmed each payment so a replay can report it.
#[derive(Debug, Default)]
pub struct LedgerState {
	records:  Vec<PaymentRecord>,
	recorded: HashMap<Uuid, ProcessorId>,
	totals:   PaymentsSummary,
	timeline: [BTreeMap<OffsetDateTime, ProcessorSummary>; 2],
}

impl LedgerState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a payment. Nothing is modified unless every index accepts it.
	pub fn append(&mut self, record: PaymentRecord) -> Result<(), LedgerError> {
		if let Some(&processor) = self.recorded.get(&record.correlation_id) {
			return Err(LedgerError::Duplicate {
				correlation_id: record.correlation_id,
				processor,
			});
		}

		let timeline = &mut self.timeline[record.processor.index()];
		let bucket = timeline
			.get(&record.processed_at)
			.copied()
			.unwrap_or_default();
		let (Some(total), Some(bucket)) = (
			self.totals.of_mut(record.processor).checked_add(record.amount),
			bucket.checked_add(record.amount),
		) else {
			return Err(LedgerError::Rejected {
				reason: format!(
					"amount {} would overflow the {} processor totals",
					record.amount, record.processor
				),
			});
		};

		*self.totals.of_mut(record.processor) = total;
		timeline.insert(record.processed_at, bucket);
		self.recorded.insert(record.correlation_id, record.processor);
		self.records.push(record);

		Ok(())
	}

	pub fn summary(&self, range: &SummaryRange) -> PaymentsSummary {
		if range.is_unbounded() {
			return self.totals.clone();
		}

		let mut summary = PaymentsSummary::default();
		// BTreeMap::range panics on an inverted range.
		if range.is_inverted() {
			return summary;
		}

		for processor in ProcessorId::ALL {
			let totals = summary.of_mut(processor);
			for (_, bucket) in self.timeline[processor.index()].range(range.bounds())
			{
				totals.merge(bucket);
			}
		}

		summary
	}

	#[cfg(test)]
	pub fn records(&self) -> &[PaymentRecord] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}
