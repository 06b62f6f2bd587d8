use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::info;
use reqwest::Client;

use crate::adapters::web::payments_handler::payments;
use crate::adapters::web::payments_summary_handler::payments_summary;
use crate::adapters::web::{json_config, query_config};
use crate::domain::ledger::Ledger;
use crate::domain::payment_processor::PaymentProcessorClient;
use crate::domain::payment_router::PaymentRouter;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::http::reqwest_payment_processor_client::ReqwestPaymentProcessorClient;
use crate::infrastructure::ledger::ledger_server::LedgerServer;
use crate::infrastructure::ledger::unix_socket_ledger::UnixSocketLedger;
use crate::infrastructure::routing::failover_payment_router::FailoverPaymentRouter;
use crate::infrastructure::routing::processor_health_tracker::{
	HealthPolicy, ProcessorHealthTracker,
};
use crate::infrastructure::workers::payment_worker_pool::PaymentWorkerPool;
use crate::infrastructure::workers::processor_health_monitor_worker::processor_health_monitor_worker;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::health_check::HealthCheckUseCase;

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;

fn ledger_client(config: &Config) -> UnixSocketLedger {
	UnixSocketLedger::new(
		&config.ledger_socket_path,
		config.ledger_pool_size,
		config.ledger_timeout(),
	)
}

/// Runs one API instance until the HTTP server stops.
pub async fn run(config: Arc<Config>) -> io::Result<()> {
	let http_client = Client::builder()
		.pool_max_idle_per_host(config.payment_workers)
		.build()
		.map_err(io::Error::other)?;

	let processor_client: Arc<dyn PaymentProcessorClient> = Arc::new(
		ReqwestPaymentProcessorClient::from_config(http_client, &config),
	);
	let ledger: Arc<dyn Ledger> = Arc::new(ledger_client(&config));
	let health = ProcessorHealthTracker::new(HealthPolicy::from(config.as_ref()));

	info!("Starting processor health monitor...");
	tokio::spawn(processor_health_monitor_worker(
		HealthCheckUseCase::new(processor_client.clone(), health.clone()),
		config.health_check_interval(),
	));

	let router: Arc<dyn PaymentRouter> = Arc::new(FailoverPaymentRouter::new(
		processor_client,
		ledger,
		health,
		config.processor_timeout(),
	));
	let worker_pool = PaymentWorkerPool::spawn(
		router,
		config.payment_workers,
		config.payment_queue_capacity,
	);
	let create_payment_use_case = CreatePaymentUseCase::new(worker_pool);

	let server_config = config.clone();
	let server = HttpServer::new(move || {
		// Each HTTP worker keeps its own ledger connections for summary reads.
		let get_payment_summary_use_case = GetPaymentSummaryUseCase::new(
			Arc::new(ledger_client(&server_config)),
		);

		App::new()
			.app_data(web::Data::new(create_payment_use_case.clone()))
			.app_data(web::Data::new(get_payment_summary_use_case))
			.app_data(json_config())
			.app_data(query_config())
			.service(payments)
			.service(payments_summary)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.workers(config.http_workers.max(1));

	let server = match &config.server_socket_path {
		Some(path) => {
			if Path::new(path).exists() {
				std::fs::remove_file(path)?;
			}
			info!("Starting Actix-Web server on unix:{path}...");
			server.bind_uds(path)?
		}
		None => {
			info!(
				"Starting Actix-Web server on {}:{}...",
				config.server_host, config.server_port
			);
			server.bind((config.server_host.as_str(), config.server_port))?
		}
	};

	server.run().await
}

/// Runs the shared ledger process until its listener fails.
pub async fn run_ledger(config: Arc<Config>) -> io::Result<()> {
	let listener = LedgerServer::bind(&config.ledger_socket_path)?;
	info!("Ledger listening on unix:{}", config.ledger_socket_path);

	LedgerServer::default().serve(listener).await
}
