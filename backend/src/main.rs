//! Process entry point: logging, configuration, and the HTTP server.

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use skillswap_backend::api::health::HealthState;
use skillswap_backend::server::{AppConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(addr = %config.bind_addr, "starting server");

    let health = web::Data::new(HealthState::default());
    let server = create_server(&config, health)?;
    server.await
}
