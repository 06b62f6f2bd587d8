use std::io;
use std::path::Path;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

use crate::domain::ledger::Ledger;
use crate::infrastructure::ledger::in_memory_ledger::InMemoryLedger;
use crate::infrastructure::ledger::protocol::{
	LedgerRequest, LedgerResponse, encode,
};

/// Serves an [`InMemoryLedger`] to every API instance over a Unix socket.
#[derive(Clone, Default)]
pub struct LedgerServer {
	ledger: InMemoryLedger,
}

impl LedgerServer {
	/// Binds `path`, replacing a socket file left behind by a previous run.
	pub fn bind(path: impl AsRef<Path>) -> io::Result<UnixListener> {
		let path = path.as_ref();
		if path.exists() {
			std::fs::remove_file(path)?;
		}
		UnixListener::bind(path)
	}

	pub async fn serve(self, listener: UnixListener) -> io::Result<()> {
		loop {
			let (stream, _) = listener.accept().await?;
			let server = self.clone();
			tokio::spawn(async move {
				if let Err(e) = server.handle_connection(stream).await {
					warn!("Ledger connection closed with error: {e}");
				}
			});
		}
	}

	async fn handle_connection(&self, stream: UnixStream) -> io::Result<()> {
		let (reader, mut writer) = stream.into_split();
		let mut lines = BufReader::new(reader).lines();

		while let Some(line) = lines.next_line().await? {
			if line.trim().is_empty() {
				continue;
			}

			let response = match serde_json::from_str::<LedgerRequest>(&line) {
				Ok(request) => self.handle(request).await,
				Err(e) => {
					warn!("Malformed ledger request: {e}");
					LedgerResponse::Error {
						message: format!("malformed request: {e}"),
					}
				}
			};

			let payload = encode(&response).map_err(io::Error::other)?;
			writer.write_all(&payload).await?;
		}

		debug!("Ledger client disconnected");
		Ok(())
	}

	pub async fn handle(&self, request: LedgerRequest) -> LedgerResponse {
		match request {
			LedgerRequest::Append { record } => {
				let correlation_id = record.correlation_id;
				let response =
					LedgerResponse::from_append(self.ledger.append(record).await);
				match &response {
					LedgerResponse::Appended => {
						debug!("Recorded payment {correlation_id}")
					}
					LedgerResponse::Duplicate { processor, .. } => info!(
						"Ignored duplicate payment {correlation_id}, already \
						 recorded by the {processor} processor"
					),
					_ => error!("Failed to record payment {correlation_id}"),
				}
				response
			}
			LedgerRequest::Summary { range } => {
				match self.ledger.summary(range).await {
					Ok(summary) => LedgerResponse::Summary { summary },
					Err(e) => LedgerResponse::Error {
						message: e.to_string(),
					},
				}
			}
		}
	}
}
