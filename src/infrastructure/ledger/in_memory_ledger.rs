use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ledger::{Ledger, LedgerError};
use crate::domain::payment::PaymentRecord;
use crate::domain::summary::{PaymentsSummary, SummaryRange};
use crate::infrastructure::ledger::ledger_state::LedgerState;

/// [`LedgerState`] behind one lock. Every append and summary goes through
/// that lock, so a summary sees exactly the appends that finished before it.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
	state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> MutexGuard<'_, LedgerState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

#[async_trait]
impl Ledger for InMemoryLedger {
	async fn append(&self, record: PaymentRecord) -> Result<(), LedgerError> {
		self.lock().append(record)
	}

	async fn summary(
		&self,
		range: SummaryRange,
	) -> Result<PaymentsSummary, LedgerError> {
		Ok(self.lock().summary(&range))
	}
}
