use actix_web::web;
use log::warn;

use crate::adapters::web::errors::ApiError;

pub mod errors;
pub mod payments_handler;
pub mod payments_summary_handler;
pub mod schema;

/// Malformed payment bodies are validation failures, not bad requests.
pub fn json_config() -> web::JsonConfig {
	web::JsonConfig::default().error_handler(|err, _req| {
		warn!("Rejected payment payload: {err}");
		ApiError::UnprocessableEntity.into()
	})
}

pub fn query_config() -> web::QueryConfig {
	web::QueryConfig::default().error_handler(|err, _req| {
		warn!("Rejected summary filter: {err}");
		ApiError::BadClientDataError.into()
	})
}
