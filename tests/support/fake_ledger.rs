use async_trait::async_trait;
use rinha_router::domain::ledger::{Ledger, LedgerError};
use rinha_router::domain::payment::PaymentRecord;
use rinha_router::domain::summary::{PaymentsSummary, SummaryRange};

/// Ledger whose every call fails as if the ledger process were down.
#[derive(Clone, Default)]
pub struct UnreachableLedger;

#[async_trait]
impl Ledger for UnreachableLedger {
	async fn append(&self, _record: PaymentRecord) -> Result<(), LedgerError> {
		Err(LedgerError::Unavailable {
			reason: "connection refused".to_string(),
		})
	}

	async fn summary(
		&self,
		_range: SummaryRange,
	) -> Result<PaymentsSummary, LedgerError> {
		Err(LedgerError::Unavailable {
			reason: "connection refused".to_string(),
		})
	}
}
