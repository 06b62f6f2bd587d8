#![allow(dead_code)]

pub mod fake_ledger;
pub mod fake_processor_client;
pub mod ledger_server;
pub mod mock_payment_processor;
