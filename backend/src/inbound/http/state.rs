//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::NewsletterCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub newsletters: Arc<dyn NewsletterCommand>,
}

impl HttpState {
    /// Build state around the newsletter use-case port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use wa_gateway::domain::ports::FixtureWhatsappClient;
    /// use wa_gateway::domain::{NewsletterService, ResolutionPolicy};
    /// use wa_gateway::inbound::http::state::HttpState;
    ///
    /// let service = NewsletterService::new(
    ///     Arc::new(FixtureWhatsappClient),
    ///     ResolutionPolicy::default(),
    /// );
    /// let state = HttpState::new(Arc::new(service));
    /// let _ = state.newsletters.clone();
    /// ```
    pub fn new(newsletters: Arc<dyn NewsletterCommand>) -> Self {
        Self { newsletters }
    }
}
