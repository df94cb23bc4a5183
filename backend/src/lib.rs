//! WhatsApp gateway admin service library.
//!
//! Layout follows a hexagonal split: [`domain`] holds newsletter rules and
//! ports, [`inbound`] adapts HTTP onto them, [`outbound`] implements the
//! WhatsApp client port, and [`server`] wires everything from [`settings`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
