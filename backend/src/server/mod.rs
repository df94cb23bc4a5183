//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::NewsletterService;
use crate::domain::ResolutionPolicy;
use crate::domain::ports::{FixtureWhatsappClient, WhatsappClient};
use crate::inbound::http::basic_auth::{BasicAuth, BasicAuthCredentials};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::newsletter::unfollow_newsletter;
use crate::inbound::http::state::HttpState;
use crate::outbound::whatsapp::GatewayWhatsappClient;

/// Build the WhatsApp client from configuration.
///
/// Uses the gateway adapter when a base URL is configured, otherwise falls
/// back to the fixture client so the service can run without a session.
///
/// # Errors
/// Returns [`std::io::Error`] if the reqwest client cannot be constructed.
pub fn build_whatsapp_client(config: &ServerConfig) -> std::io::Result<Arc<dyn WhatsappClient>> {
    match &config.gateway {
        Some(gateway) => {
            let client = GatewayWhatsappClient::new(gateway.base_url.clone(), gateway.timeout)
                .map_err(|e| std::io::Error::other(format!("gateway client build failed: {e}")))?;
            let client = match &gateway.username {
                Some(username) => {
                    client.with_basic_auth(username.as_str(), gateway.password.clone())
                }
                None => client,
            };
            info!(base_url = %gateway.base_url, "using WhatsApp gateway client");
            Ok(Arc::new(client))
        }
        None => {
            warn!("GO_WA_API_URL not set; using fixture WhatsApp client");
            Ok(Arc::new(FixtureWhatsappClient))
        }
    }
}

/// Wire the newsletter use-case around a shared client handle.
pub fn build_http_state(client: Arc<dyn WhatsappClient>, policy: ResolutionPolicy) -> HttpState {
    HttpState::new(Arc::new(NewsletterService::new(client, policy)))
}

/// Everything the Actix application factory needs per worker.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub basic_auth: BasicAuthCredentials,
}

/// Build the Actix application with routes and middleware.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        basic_auth,
    } = deps;

    let newsletter = web::scope("/newsletter")
        .wrap(BasicAuth::new(basic_auth))
        .service(unfollow_newsletter);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(newsletter)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Actix signal handling is disabled; pair the returned server with
/// [`drain_on_shutdown_signal`] so the probes fail before connections close.
///
/// # Errors
/// Propagates [`std::io::Error`] when building the client, binding the
/// socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let client = build_whatsapp_client(&config)?;
    let ServerConfig {
        bind_addr,
        basic_auth,
        policy,
        gateway: _,
    } = config;
    let http_state = web::Data::new(build_http_state(client, policy));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            basic_auth: basic_auth.clone(),
        })
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}

/// Wait for Ctrl-C or SIGTERM, then [`drain`] the server.
pub async fn drain_on_shutdown_signal(
    handle: ServerHandle,
    health_state: web::Data<HealthState>,
) {
    shutdown_signal().await;
    drain(handle, &health_state).await;
}

/// Fail both probes, then stop the server once in-flight requests finish.
pub async fn drain(handle: ServerHandle, health_state: &HealthState) {
    health_state.begin_draining();
    info!("draining server");
    handle.stop(true).await;
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                result = tokio::signal::ctrl_c() => log_signal_error(result),
                _ = terminate.recv() => {}
            }
        }
        Err(error) => {
            warn!(%error, "SIGTERM handler unavailable; waiting for Ctrl-C only");
            log_signal_error(tokio::signal::ctrl_c().await);
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    log_signal_error(tokio::signal::ctrl_c().await);
}

fn log_signal_error(result: std::io::Result<()>) {
    if let Err(error) = result {
        warn!(%error, "Ctrl-C handler failed; draining now");
    }
}
