use derive_more::{Display, Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::processor::ProcessorId;

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ValidationError {
	#[display("amount must be greater than zero")]
	NonPositiveAmount,
	#[display("amount must not exceed {}", Payment::MAX_AMOUNT)]
	AmountTooLarge,
}

/// A payment accepted from a client and waiting to be routed.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
	pub correlation_id: Uuid,
	pub amount:         Decimal,
	pub requested_at:   OffsetDateTime,
}

impl Payment {
	/// One quadrillion.
	pub const MAX_AMOUNT: Decimal =
		Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

	pub fn new(
		correlation_id: Uuid,
		amount: Decimal,
	) -> Result<Self, ValidationError> {
		if amount <= Decimal::ZERO {
			return Err(ValidationError::NonPositiveAmount);
		}
		if amount > Self::MAX_AMOUNT {
			return Err(ValidationError::AmountTooLarge);
		}

		Ok(Self {
			correlation_id,
			amount,
			requested_at: OffsetDateTime::now_utc(),
		})
	}
}

/// Immutable ledger entry for a payment confirmed by a processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
	pub correlation_id: Uuid,
	#[serde(with = "rust_decimal::serde::str")]
	pub amount:         Decimal,
	pub processor:      ProcessorId,
	#[serde(with = "time::serde::rfc3339")]
	pub processed_at:   OffsetDateTime,
}

impl PaymentRecord {
	pub fn of(
		payment: &Payment,
		processor: ProcessorId,
		processed_at: OffsetDateTime,
	) -> Self {
		Self {
			correlation_id: payment.correlation_id,
			amount: payment.amount,
			processor,
			processed_at,
		}
	}
}
