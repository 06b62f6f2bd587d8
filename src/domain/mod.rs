pub mod health_status;
pub mod ledger;
pub mod payment;
pub mod payment_processor;
pub mod payment_router;
pub mod processor;
pub mod summary;
