use std::sync::Arc;

use crate::domain::ledger::{Ledger, LedgerError};
use crate::domain::summary::SummaryRange;
use crate::use_cases::dto::{GetPaymentSummaryQuery, PaymentsSummaryResponse};

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase {
	ledger: Arc<dyn Ledger>,
}

impl GetPaymentSummaryUseCase {
	pub fn new(ledger: Arc<dyn Ledger>) -> Self {
		Self { ledger }
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummaryResponse, LedgerError> {
		let summary = self
			.ledger
			.summary(SummaryRange::new(query.from, query.to))
			.await?;

		Ok(summary.into())
	}
}
