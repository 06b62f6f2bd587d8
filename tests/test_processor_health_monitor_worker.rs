use std::sync::Arc;

use reqwest::Client;
use rinha_router::domain::payment_processor::HealthReport;
use rinha_router::domain::processor::ProcessorId;
use rinha_router::infrastructure::http::reqwest_payment_processor_client::ReqwestPaymentProcessorClient;
use rinha_router::infrastructure::routing::processor_health_tracker::ProcessorHealthTracker;
use rinha_router::infrastructure::workers::processor_health_monitor_worker::processor_health_monitor_worker;
use rinha_router::use_cases::health_check::HealthCheckUseCase;
use tokio::time::{Duration, sleep};

mod support;

use crate::support::fake_processor_client::{Behavior, FakeProcessorClient};
use crate::support::mock_payment_processor::{MockBehavior, start_mock_processor};

#[actix_web::test]
async fn test_processor_health_monitor_worker_reads_processor_health() {
	let default = start_mock_processor(MockBehavior::Accept, false, 5);
	let fallback = start_mock_processor(MockBehavior::Accept, true, 80);
	let client = ReqwestPaymentProcessorClient::new(
		Client::new(),
		default.url.as_str(),
		fallback.url.as_str(),
		Duration::from_secs(1),
	);
	let tracker = ProcessorHealthTracker::default();

	let worker_handle = tokio::spawn(processor_health_monitor_worker(
		HealthCheckUseCase::new(Arc::new(client), tracker.clone()),
		Duration::from_secs(5),
	));

	sleep(Duration::from_millis(500)).await;

	let default_health = tracker.snapshot(ProcessorId::Default);
	assert!(!default_health.failing);
	assert_eq!(default_health.min_response_time_ms, 5);
	assert!(default_health.last_checked_at.is_some());

	let fallback_health = tracker.snapshot(ProcessorId::Fallback);
	assert!(fallback_health.failing);
	assert_eq!(fallback_health.min_response_time_ms, 80);

	worker_handle.abort();
	default.stop().await;
	fallback.stop().await;
}

#[tokio::test]
async fn test_marks_processor_as_failing_when_unreachable() {
	let client = FakeProcessorClient::new(Behavior::Succeed, Behavior::Succeed);
	client.set_health(
		ProcessorId::Fallback,
		Some(HealthReport {
			failing:              false,
			min_response_time_ms: 0,
		}),
	);
	let tracker = ProcessorHealthTracker::default();

	let worker_handle = tokio::spawn(processor_health_monitor_worker(
		HealthCheckUseCase::new(Arc::new(client), tracker.clone()),
		Duration::from_secs(5),
	));

	sleep(Duration::from_millis(100)).await;

	assert!(!tracker.is_healthy(ProcessorId::Default));
	assert!(tracker.is_healthy(ProcessorId::Fallback));

	worker_handle.abort();
}

#[tokio::test]
async fn test_recovery_is_picked_up_on_next_health_check() {
	let client = FakeProcessorClient::new(Behavior::Succeed, Behavior::Succeed);
	let tracker = ProcessorHealthTracker::default();

	let worker_handle = tokio::spawn(processor_health_monitor_worker(
		HealthCheckUseCase::new(Arc::new(client.clone()), tracker.clone()),
		Duration::from_millis(50),
	));

	sleep(Duration::from_millis(20)).await;
	assert!(!tracker.is_healthy(ProcessorId::Default));

	client.set_health(
		ProcessorId::Default,
		Some(HealthReport {
			failing:              false,
			min_response_time_ms: 12,
		}),
	);
	sleep(Duration::from_millis(150)).await;

	assert!(tracker.is_healthy(ProcessorId::Default));
	assert_eq!(tracker.snapshot(ProcessorId::Default).min_response_time_ms, 12);

	worker_handle.abort();
}

#[actix_web::test]
async fn test_rate_limited_health_check_is_not_a_failure() {
	let default = start_mock_processor(MockBehavior::TooManyRequests, false, 5);
	let fallback = start_mock_processor(MockBehavior::Accept, false, 5);
	let client = ReqwestPaymentProcessorClient::new(
		Client::new(),
		default.url.as_str(),
		fallback.url.as_str(),
		Duration::from_secs(1),
	);
	let tracker = ProcessorHealthTracker::default();

	let worker_handle = tokio::spawn(processor_health_monitor_worker(
		HealthCheckUseCase::new(Arc::new(client), tracker.clone()),
		Duration::from_secs(5),
	));

	sleep(Duration::from_millis(500)).await;

	let default_health = tracker.snapshot(ProcessorId::Default);
	assert!(!default_health.failing);
	assert!(default_health.last_checked_at.is_none());
	assert!(tracker.is_healthy(ProcessorId::Default));
	assert!(tracker.snapshot(ProcessorId::Fallback).last_checked_at.is_some());

	worker_handle.abort();
	default.stop().await;
	fallback.stop().await;
}

#[tokio::test]
async fn test_rate_limited_health_check_keeps_the_previous_state() {
	let client = FakeProcessorClient::new(Behavior::Succeed, Behavior::Succeed);
	let tracker = ProcessorHealthTracker::default();
	let health_check =
		HealthCheckUseCase::new(Arc::new(client.clone()), tracker.clone());

	client.set_health(
		ProcessorId::Fallback,
		Some(HealthReport {
			failing:              true,
			min_response_time_ms: 40,
		}),
	);
	assert!(health_check.execute(ProcessorId::Fallback).await.failing);

	client.set_rate_limited(ProcessorId::Fallback, true);
	let health = health_check.execute(ProcessorId::Fallback).await;

	assert!(health.failing);
	assert_eq!(health.min_response_time_ms, 40);
	assert!(!tracker.is_healthy(ProcessorId::Fallback));

	client.set_rate_limited(ProcessorId::Default, true);
	let health = health_check.execute(ProcessorId::Default).await;

	assert!(!health.failing);
	assert!(tracker.is_healthy(ProcessorId::Default));
}
