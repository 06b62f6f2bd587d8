use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
	Accept,
	ServerError,
	/// Throttles payments and health checks alike.
	TooManyRequests,
	Reject,
	Slow(Duration),
}

#[derive(Clone)]
struct MockState {
	behavior:          MockBehavior,
	failing:           bool,
	min_response_time: u64,
	received:          Arc<Mutex<Vec<Value>>>,
	tokens:            Arc<Mutex<Vec<Option<String>>>>,
}

/// Payment processor served by a real HTTP server on a random local port.
pub struct MockPaymentProcessor {
	pub url:  String,
	received: Arc<Mutex<Vec<Value>>>,
	tokens:   Arc<Mutex<Vec<Option<String>>>>,
	handle:   ServerHandle,
}

impl MockPaymentProcessor {
	pub fn received(&self) -> Vec<Value> {
		self.received.lock().unwrap().clone()
	}

	pub fn tokens(&self) -> Vec<Option<String>> {
		self.tokens.lock().unwrap().clone()
	}

	pub async fn stop(self) {
		self.handle.stop(false).await;
	}
}

async fn accept_payment(
	req: HttpRequest,
	body: web::Json<Value>,
	state: web::Data<MockState>,
) -> HttpResponse {
	state.received.lock().unwrap().push(body.into_inner());
	state.tokens.lock().unwrap().push(
		req.headers()
			.get("X-Rinha-Token")
			.and_then(|value| value.to_str().ok())
			.map(str::to_string),
	);

	match state.behavior {
		MockBehavior::Accept => HttpResponse::Ok()
			.json(json!({ "message": "payment processed successfully" })),
		MockBehavior::ServerError => HttpResponse::InternalServerError().finish(),
		MockBehavior::TooManyRequests => HttpResponse::TooManyRequests().finish(),
		MockBehavior::Reject => HttpResponse::UnprocessableEntity().finish(),
		MockBehavior::Slow(delay) => {
			tokio::time::sleep(delay).await;
			HttpResponse::Ok().finish()
		}
	}
}

async fn service_health(state: web::Data<MockState>) -> HttpResponse {
	if state.behavior == MockBehavior::TooManyRequests {
		return HttpResponse::TooManyRequests().finish();
	}

	HttpResponse::Ok().json(json!({
		"failing": state.failing,
		"minResponseTime": state.min_response_time,
	}))
}

pub fn start_mock_processor(
	behavior: MockBehavior,
	failing: bool,
	min_response_time: u64,
) -> MockPaymentProcessor {
	let received = Arc::new(Mutex::new(Vec::new()));
	let tokens = Arc::new(Mutex::new(Vec::new()));
	let state = MockState {
		behavior,
		failing,
		min_response_time,
		received: received.clone(),
		tokens: tokens.clone(),
	};

	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let port = listener.local_addr().unwrap().port();

	let server = HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(state.clone()))
			.route("/payments", web::post().to(accept_payment))
			.route("/payments/service-health", web::get().to(service_health))
	})
	.workers(1)
	.listen(listener)
	.unwrap()
	.run();

	let handle = server.handle();
	actix_web::rt::spawn(server);

	MockPaymentProcessor {
		url: format!("http://127.0.0.1:{port}"),
		received,
		tokens,
		handle,
	}
}
