use async_trait::async_trait;
use derive_more::{Display, Error};
use time::OffsetDateTime;

use crate::domain::ledger::LedgerError;
use crate::domain::payment::Payment;
use crate::domain::processor::ProcessorId;

#[derive(Debug, Clone, PartialEq)]
pub struct RouterResult {
	pub processor:    ProcessorId,
	pub confirmed_at: OffsetDateTime,
	/// The ledger already held this correlation id. `processor` is then the
	/// one the payment was first recorded with.
	pub replayed:     bool,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum RouterError {
	#[display("both payment processors are unavailable")]
	BothProcessorsUnavailable,
	#[display("{processor} processor refused the payment with status {status}")]
	PaymentRejected { processor: ProcessorId, status: u16 },
	#[display("payment confirmed upstream but not recorded: {source}")]
	LedgerWrite { source: LedgerError },
}

#[async_trait]
pub trait PaymentRouter: Send + Sync + 'static {
	async fn route(&self, payment: &Payment) -> Result<RouterResult, RouterError>;
}
