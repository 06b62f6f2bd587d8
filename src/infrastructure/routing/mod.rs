pub mod failover_payment_router;
pub mod processor_health_tracker;
