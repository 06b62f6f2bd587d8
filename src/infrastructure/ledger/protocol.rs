//! Newline-delimited JSON spoken between API instances and the ledger process.
//!
//! Each request is one JSON object on its own line and gets exactly one
//! response line back, in order, on the same connection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ledger::LedgerError;
use crate::domain::payment::PaymentRecord;
use crate::domain::processor::ProcessorId;
use crate::domain::summary::{PaymentsSummary, SummaryRange};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerRequest {
	Append {
		record: PaymentRecord,
	},
	Summary {
		#[serde(default)]
		range: SummaryRange,
	},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LedgerResponse {
	Appended,
	Duplicate {
		correlation_id: Uuid,
		processor:      ProcessorId,
	},
	Summary { summary: PaymentsSummary },
	Error { message: String },
}

impl LedgerResponse {
	pub fn from_append(result: Result<(), LedgerError>) -> Self {
		match result {
			Ok(()) => LedgerResponse::Appended,
			Err(LedgerError::Duplicate {
				correlation_id,
				processor,
			}) => LedgerResponse::Duplicate {
				correlation_id,
				processor,
			},
			Err(e) => LedgerResponse::Error {
				message: e.to_string(),
			},
		}
	}
}

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, serde_json::Error> {
	let mut line = serde_json::to_vec(message)?;
	line.push(b'\n');
	Ok(line)
}

#[cfg(test)]
mod tests {
	use rust_decimal_macros::dec;
	use time::OffsetDateTime;

	use super::*;

	#[test]
	fn test_append_request_shape() {
		let record = PaymentRecord {
			correlation_id: Uuid::nil(),
			amount:         dec!(19.90),
			processor:      ProcessorId::Fallback,
			processed_at:   OffsetDateTime::UNIX_EPOCH,
		};

		let line = encode(&LedgerRequest::Append { record }).unwrap();
		let json: serde_json::Value = serde_json::from_slice(&line).unwrap();

		assert_eq!(line.last(), Some(&b'\n'));
		assert_eq!(json["op"], "append");
		assert_eq!(json["record"]["amount"], "19.90");
		assert_eq!(json["record"]["processor"], "fallback");
		assert_eq!(json["record"]["processedAt"], "1970-01-01T00:00:00Z");
	}

	#[test]
	fn test_summary_request_without_range_is_unbounded() {
		let request: LedgerRequest =
			serde_json::from_str(r#"{"op":"summary"}"#).unwrap();

		assert_eq!(request, LedgerRequest::Summary {
			range: SummaryRange::unbounded(),
		});
	}

	#[test]
	fn test_duplicate_append_maps_to_duplicate_response() {
		let id = Uuid::new_v4();
		let response = LedgerResponse::from_append(Err(LedgerError::Duplicate {
			correlation_id: id,
			processor:      ProcessorId::Fallback,
		}));

		assert_eq!(response, LedgerResponse::Duplicate {
			correlation_id: id,
			processor:      ProcessorId::Fallback,
		});
		let json = serde_json::to_value(&response).unwrap();
		assert_eq!(json["status"], "duplicate");
		assert_eq!(json["processor"], "fallback");
	}
}
