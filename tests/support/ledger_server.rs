use std::io;
use std::path::PathBuf;

use rinha_router::infrastructure::ledger::ledger_server::LedgerServer;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub struct TestLedgerServer {
	pub path: PathBuf,
	handle:   JoinHandle<io::Result<()>>,
}

impl Drop for TestLedgerServer {
	fn drop(&mut self) {
		self.handle.abort();
		let _ = std::fs::remove_file(&self.path);
	}
}

pub fn unused_socket_path() -> PathBuf {
	std::env::temp_dir().join(format!("rinha-ledger-{}.sock", Uuid::new_v4()))
}

/// Must be called from inside a Tokio runtime.
pub fn start_ledger_server() -> TestLedgerServer {
	let path = unused_socket_path();
	let listener = LedgerServer::bind(&path).unwrap();
	let handle = tokio::spawn(LedgerServer::default().serve(listener));

	TestLedgerServer { path, handle }
}
