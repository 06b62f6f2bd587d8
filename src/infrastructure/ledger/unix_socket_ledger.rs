use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::domain::ledger::{Ledger, LedgerError};
use crate::domain::payment::PaymentRecord;
use crate::domain::summary::{PaymentsSummary, SummaryRange};
use crate::infrastructure::ledger::protocol::{
	LedgerRequest, LedgerResponse, encode,
};

type LedgerConnection = BufReader<UnixStream>;

/// [`Ledger`] client talking to `rinha-ledger` over its Unix socket.
///
/// Connections are opened lazily and up to `pool_size` idle ones are kept for
/// reuse. Each call, including connecting, is bounded by `timeout`.
#[derive(Clone)]
pub struct UnixSocketLedger {
	path:      PathBuf,
	idle:      Arc<Mutex<Vec<LedgerConnection>>>,
	pool_size: usize,
	timeout:   Duration,
}

impl UnixSocketLedger {
	pub fn new(path: impl AsRef<Path>, pool_size: usize, timeout: Duration) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			idle: Arc::new(Mutex::new(Vec::with_capacity(pool_size))),
			pool_size,
			timeout,
		}
	}

	pub fn idle_connections(&self) -> usize {
		self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
	}

	async fn call(
		&self,
		request: &LedgerRequest,
	) -> Result<LedgerResponse, LedgerError> {
		let payload = encode(request).map_err(|e| LedgerError::Protocol {
			reason: e.to_string(),
		})?;

		let (connection, line) = timeout(self.timeout, self.exchange(&payload))
			.await
			.map_err(|_| LedgerError::Timeout)?
			.map_err(|e| LedgerError::Unavailable {
				reason: e.to_string(),
			})?;

		let response = serde_json::from_str::<LedgerResponse>(&line).map_err(
			|e| LedgerError::Protocol {
				reason: e.to_string(),
			},
		)?;
		self.release(connection);

		Ok(response)
	}

	async fn exchange(
		&self,
		payload: &[u8],
	) -> io::Result<(LedgerConnection, String)> {
		if let Some(mut connection) = self.take_idle() {
			match Self::round_trip(&mut connection, payload).await {
				Ok(line) => return Ok((connection, line)),
				// Both operations are idempotent, so resending on a fresh
				// connection cannot double count.
				Err(e) => debug!("Pooled ledger connection failed, reconnecting: {e}"),
			}
		}

		let mut connection = BufReader::new(UnixStream::connect(&self.path).await?);
		let line = Self::round_trip(&mut connection, payload).await?;
		Ok((connection, line))
	}

	async fn round_trip(
		connection: &mut LedgerConnection,
		payload: &[u8],
	) -> io::Result<String> {
		connection.get_mut().write_all(payload).await?;

		let mut line = String::new();
		if connection.read_line(&mut line).await? == 0 {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				"ledger closed the connection",
			));
		}
		Ok(line)
	}

	fn take_idle(&self) -> Option<LedgerConnection> {
		self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop()
	}

	fn release(&self, connection: LedgerConnection) {
		let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
		if idle.len() < self.pool_size {
			idle.push(connection);
		}
	}
}

#[async_trait]
impl Ledger for UnixSocketLedger {
	async fn append(&self, record: PaymentRecord) -> Result<(), LedgerError> {
		let correlation_id = record.correlation_id;
		match self.call(&LedgerRequest::Append { record }).await? {
			LedgerResponse::Appended => Ok(()),
			LedgerResponse::Duplicate {
				correlation_id,
				processor,
			} => Err(LedgerError::Duplicate {
				correlation_id,
				processor,
			}),
			LedgerResponse::Error { message } => {
				warn!("Ledger refused payment {correlation_id}: {message}");
				Err(LedgerError::Rejected { reason: message })
			}
			other => Err(LedgerError::Protocol {
				reason: format!("unexpected answer to append: {other:?}"),
			}),
		}
	}

	async fn summary(
		&self,
		range: SummaryRange,
	) -> Result<PaymentsSummary, LedgerError> {
		match self.call(&LedgerRequest::Summary { range }).await? {
			LedgerResponse::Summary { summary } => Ok(summary),
			LedgerResponse::Error { message } => {
				Err(LedgerError::Rejected { reason: message })
			}
			other => Err(LedgerError::Protocol {
				reason: format!("unexpected answer to summary: {other:?}"),
			}),
		}
	}
}
