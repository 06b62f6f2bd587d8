use std::sync::Arc;

use derive_more::{Display, Error};
use log::{debug, info};
use tokio::sync::{Mutex, mpsc, oneshot};

use crate::domain::payment::Payment;
use crate::domain::payment_router::{PaymentRouter, RouterError, RouterResult};

#[derive(Debug, Display, Error)]
pub enum DispatchError {
	#[display("payment worker pool is closed")]
	Closed,
	#[display("{source}")]
	Routing { source: RouterError },
}

struct PaymentJob {
	payment: Payment,
	reply:   oneshot::Sender<Result<RouterResult, RouterError>>,
}

/// Fixed set of worker tasks, each routing one payment at a time.
///
/// A job runs to completion inside its worker even if the caller stops
/// waiting, so a dropped client connection never abandons a payment between
/// the processor call and the ledger append.
#[derive(Clone)]
pub struct PaymentWorkerPool {
	sender: mpsc::Sender<PaymentJob>,
	size:   usize,
}

impl PaymentWorkerPool {
	pub fn spawn(
		router: Arc<dyn PaymentRouter>,
		size: usize,
		queue_capacity: usize,
	) -> Self {
		let size = size.max(1);
		let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
		let receiver = Arc::new(Mutex::new(receiver));

		for worker_id in 0..size {
			tokio::spawn(payment_worker(worker_id, receiver.clone(), router.clone()));
		}
		info!("Started {size} payment workers");

		Self { sender, size }
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub async fn dispatch(&self, payment: Payment) -> Result<RouterResult, DispatchError> {
		let (reply, response) = oneshot::channel();
		self.sender
			.send(PaymentJob { payment, reply })
			.await
			.map_err(|_| DispatchError::Closed)?;

		response
			.await
			.map_err(|_| DispatchError::Closed)?
			.map_err(|source| DispatchError::Routing { source })
	}
}

async fn payment_worker(
	worker_id: usize,
	receiver: Arc<Mutex<mpsc::Receiver<PaymentJob>>>,
	router: Arc<dyn PaymentRouter>,
) {
	loop {
		let job = receiver.lock().await.recv().await;
		let Some(PaymentJob { payment, reply }) = job else {
			break;
		};

		let result = router.route(&payment).await;
		if reply.send(result).is_err() {
			debug!(
				"[worker-{worker_id}] Caller went away before payment {} finished",
				payment.correlation_id
			);
		}
	}

	debug!("[worker-{worker_id}] Queue closed, exiting");
}
