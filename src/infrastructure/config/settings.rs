use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
	pub default_payment_processor_url:  String,
	pub fallback_payment_processor_url: String,
	pub processor_token:                Option<String>,
	pub server_host:                    String,
	pub server_port:                    u16,
	/// Listen on this Unix socket instead of `server_host:server_port`.
	pub server_socket_path:             Option<String>,
	pub server_keepalive:               u64,
	pub http_workers:                   usize,
	pub payment_workers:                usize,
	pub payment_queue_capacity:         usize,
	pub processor_timeout_ms:           u64,
	pub health_check_interval_ms:       u64,
	pub health_failure_threshold:       u32,
	pub optimistic_retry_cooldown_ms:   u64,
	pub latency_tolerance_ms:           u64,
	pub ledger_socket_path:             String,
	pub ledger_pool_size:               usize,
	pub ledger_timeout_ms:              u64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			default_payment_processor_url:  "http://payment-processor-default:8080"
				.to_string(),
			fallback_payment_processor_url: "http://payment-processor-fallback:8080"
				.to_string(),
			processor_token:                None,
			server_host:                    "0.0.0.0".to_string(),
			server_port:                    9999,
			server_socket_path:             None,
			server_keepalive:               75,
			http_workers:                   1,
			payment_workers:                16,
			payment_queue_capacity:         1024,
			processor_timeout_ms:           500,
			health_check_interval_ms:       5000,
			health_failure_threshold:       1,
			optimistic_retry_cooldown_ms:   1000,
			latency_tolerance_ms:           100,
			ledger_socket_path:             "/tmp/rinha-ledger.sock".to_string(),
			ledger_pool_size:               32,
			ledger_timeout_ms:              1000,
		}
	}
}

impl Config {
	/// Reads `APP_*` environment variables over the built-in defaults.
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.add_source(config::Config::try_from(&Config::default())?)
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn processor_timeout(&self) -> Duration {
		Duration::from_millis(self.processor_timeout_ms)
	}

	pub fn health_check_interval(&self) -> Duration {
		Duration::from_millis(self.health_check_interval_ms)
	}

	pub fn optimistic_retry_cooldown(&self) -> Duration {
		Duration::from_millis(self.optimistic_retry_cooldown_ms)
	}

	pub fn ledger_timeout(&self) -> Duration {
		Duration::from_millis(self.ledger_timeout_ms)
	}
}
