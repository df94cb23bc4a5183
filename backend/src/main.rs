//! Service entry-point: loads settings, initialises logging and runs the server.

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use wa_gateway::inbound::http::health::HealthState;
use wa_gateway::server::{ServerConfig, create_server, drain_on_shutdown_signal};
use wa_gateway::settings::{APP_VERSION, Settings, load_settings};

const ENV_FILE: &str = ".env";

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Settings pick the log level, so loading logs through a scoped subscriber.
    let bootstrap = fmt().with_env_filter(EnvFilter::new("warn")).json().finish();
    let settings = tracing::subscriber::with_default(bootstrap, || {
        load_settings(&DefaultEnv::new(), ENV_FILE)
    })
    .map_err(|e| std::io::Error::other(format!("settings: {e}")))?;
    init_tracing(&settings);
    info!(
        version = APP_VERSION,
        os = %settings.app.os,
        port = settings.app.port,
        "starting wa-gateway"
    );

    let config = ServerConfig::from_settings(&settings)?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on_shutdown_signal(server.handle(), health_state));
    server.await
}
