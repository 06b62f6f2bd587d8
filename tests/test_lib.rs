use std::net::TcpListener;
use std::sync::Arc;

use rinha_router::infrastructure::config::settings::Config;
use rinha_router::run;

#[actix_web::test]
async fn test_run_bind_error() {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let config = Config {
		server_host: "127.0.0.1".to_string(),
		server_port: listener.local_addr().unwrap().port(),
		default_payment_processor_url: "http://127.0.0.1:1".to_string(),
		fallback_payment_processor_url: "http://127.0.0.1:1".to_string(),
		..Config::default()
	};

	assert!(run(Arc::new(config)).await.is_err());
	drop(listener);
}
