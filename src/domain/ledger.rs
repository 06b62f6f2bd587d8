use async_trait::async_trait;
use derive_more::{Display, Error};
use uuid::Uuid;

use crate::domain::payment::PaymentRecord;
use crate::domain::processor::ProcessorId;
use crate::domain::summary::{PaymentsSummary, SummaryRange};

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum LedgerError {
	#[display("payment {correlation_id} is already recorded by the {processor} processor")]
	Duplicate {
		correlation_id: Uuid,
		processor:      ProcessorId,
	},
	#[display("ledger unavailable: {reason}")]
	Unavailable { reason: String },
	#[display("ledger did not answer in time")]
	Timeout,
	#[display("ledger protocol error: {reason}")]
	Protocol { reason: String },
	#[display("ledger rejected the request: {reason}")]
	Rejected { reason: String },
}

/// Append-only store of processed payments and the single source of truth for
/// summaries.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
	/// Records a payment once. A second append for the same correlation id
	/// fails with [`LedgerError::Duplicate`], naming the processor of the first
	/// append, and leaves the totals untouched.
	async fn append(&self, record: PaymentRecord) -> Result<(), LedgerError>;

	/// Totals per processor over every append that completed before this call.
	async fn summary(
		&self,
		range: SummaryRange,
	) -> Result<PaymentsSummary, LedgerError>;
}
