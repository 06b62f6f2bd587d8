pub mod reqwest_payment_processor_client;
