use std::time::Duration;

use log::info;
use tokio::time::sleep;

use crate::domain::processor::ProcessorId;
use crate::use_cases::health_check::HealthCheckUseCase;

pub async fn processor_health_monitor_worker(
	health_check_use_case: HealthCheckUseCase,
	interval: Duration,
) {
	info!("Processor health monitor running every {interval:?}");

	loop {
		for processor in ProcessorId::ALL {
			health_check_use_case.execute(processor).await;
		}
		// Upstream health endpoints are rate limited.
		sleep(interval).await;
	}
}
