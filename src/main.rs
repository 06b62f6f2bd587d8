use std::io;
use std::sync::Arc;

use env_logger::Env;
use rinha_router::infrastructure::config::settings::Config;
use rinha_router::run;

#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let config = Arc::new(Config::load().map_err(io::Error::other)?);
	run(config).await
}
