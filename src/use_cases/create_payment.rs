use derive_more::{Display, Error};

use crate::domain::payment::{Payment, ValidationError};
use crate::domain::payment_router::{RouterError, RouterResult};
use crate::infrastructure::workers::payment_worker_pool::{
	DispatchError, PaymentWorkerPool,
};
use crate::use_cases::dto::CreatePaymentCommand;

#[derive(Debug, Display, Error)]
pub enum CreatePaymentError {
	#[display("invalid payment: {_0}")]
	Invalid(ValidationError),
	#[display("{_0}")]
	Routing(RouterError),
	#[display("no payment worker is available")]
	WorkersUnavailable,
}

#[derive(Clone)]
pub struct CreatePaymentUseCase {
	worker_pool: PaymentWorkerPool,
}

impl CreatePaymentUseCase {
	pub fn new(worker_pool: PaymentWorkerPool) -> Self {
		Self { worker_pool }
	}

	pub async fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<RouterResult, CreatePaymentError> {
		let payment = Payment::new(command.correlation_id, command.amount)
			.map_err(CreatePaymentError::Invalid)?;

		self.worker_pool
			.dispatch(payment)
			.await
			.map_err(|e| match e {
				DispatchError::Closed => CreatePaymentError::WorkersUnavailable,
				DispatchError::Routing { source } => {
					CreatePaymentError::Routing(source)
				}
			})
	}
}
