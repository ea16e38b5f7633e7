use std::sync::Arc;

use payment_relay::config::Config;
use payment_relay::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Arc::new(
		Config::load()
			.map_err(|e| std::io::Error::other(e.to_string()))?,
	);
	run(config).await
}
