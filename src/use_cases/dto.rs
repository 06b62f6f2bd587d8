use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::summary::{PaymentsSummary, ProcessorSummary};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreatePaymentCommand {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetPaymentSummaryQuery {
	pub from: Option<OffsetDateTime>,
	pub to:   Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentSummaryResult {
	#[serde(rename = "totalRequests")]
	pub total_requests: u64,
	#[serde(rename = "totalAmount", with = "rust_decimal::serde::float")]
	pub total_amount:   Decimal,
}

impl From<ProcessorSummary> for PaymentSummaryResult {
	fn from(summary: ProcessorSummary) -> Self {
		Self {
			total_requests: summary.total_requests,
			total_amount:   summary.total_amount,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentsSummaryResponse {
	pub default:  PaymentSummaryResult,
	pub fallback: PaymentSummaryResult,
}

impl From<PaymentsSummary> for PaymentsSummaryResponse {
	fn from(summary: PaymentsSummary) -> Self {
		Self {
			default:  summary.default.into(),
			fallback: summary.fallback.into(),
		}
	}
}
