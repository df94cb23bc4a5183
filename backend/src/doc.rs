//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the newsletter and health endpoints, the shared error
//! envelope, and the HTTP basic security scheme guarding `/newsletter`. The
//! document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::health::{HealthPhase, HealthReport};
use crate::inbound::http::newsletter::{SuccessResponse, UnfollowNewsletterRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the basic-auth security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BasicAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "WhatsApp gateway admin API",
        description = "Newsletter administration on a WhatsApp session, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BasicAuth" = [])),
    paths(
        crate::inbound::http::newsletter::unfollow_newsletter,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UnfollowNewsletterRequest,
        SuccessResponse,
        ErrorSchema,
        ErrorCodeSchema,
        HealthReport,
        HealthPhase
    )),
    tags(
        (name = "newsletter", description = "Newsletter channel subscriptions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
