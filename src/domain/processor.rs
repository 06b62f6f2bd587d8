use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One of the two upstream payment processors.
#[derive(
	Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorId {
	/// Cheaper processor, preferred whenever it is usable.
	#[display("default")]
	Default,
	#[display("fallback")]
	Fallback,
}

impl ProcessorId {
	pub const ALL: [ProcessorId; 2] = [ProcessorId::Default, ProcessorId::Fallback];

	pub fn other(self) -> ProcessorId {
		match self {
			ProcessorId::Default => ProcessorId::Fallback,
			ProcessorId::Fallback => ProcessorId::Default,
		}
	}

	/// Stable slot used by fixed-size per-processor tables.
	pub fn index(self) -> usize {
		match self {
			ProcessorId::Default => 0,
			ProcessorId::Fallback => 1,
		}
	}
}
