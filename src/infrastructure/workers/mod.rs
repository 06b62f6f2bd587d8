pub mod payment_worker_pool;
pub mod processor_health_monitor_worker;
