use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::payment_router::RouterResult;
use crate::domain::processor::ProcessorId;
use crate::use_cases::dto::{CreatePaymentCommand, GetPaymentSummaryQuery};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	#[serde(with = "rust_decimal::serde::float")]
	pub amount:         Decimal,
}

impl From<PaymentRequest> for CreatePaymentCommand {
	fn from(request: PaymentRequest) -> Self {
		Self {
			correlation_id: request.correlation_id,
			amount:         request.amount,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Processed,
	/// Already in the ledger from an earlier submission.
	Replayed,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentResponse {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub processor:      ProcessorId,
	pub status:         PaymentStatus,
}

impl PaymentResponse {
	pub fn of(correlation_id: Uuid, result: &RouterResult) -> Self {
		Self {
			correlation_id,
			processor: result.processor,
			status: if result.replayed {
				PaymentStatus::Replayed
			} else {
				PaymentStatus::Processed
			},
		}
	}
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentsSummaryFilter {
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub from: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub to:   Option<OffsetDateTime>,
}

impl From<PaymentsSummaryFilter> for GetPaymentSummaryQuery {
	fn from(filter: PaymentsSummaryFilter) -> Self {
		Self {
			from: filter.from,
			to:   filter.to,
		}
	}
}
