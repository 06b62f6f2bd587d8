pub mod config;
pub mod http;
pub mod ledger;
pub mod routing;
pub mod workers;
