//! HTTP server configuration object and helpers.

use std::net::{Ipv4Addr, SocketAddr};

use crate::domain::ResolutionPolicy;
use crate::inbound::http::basic_auth::BasicAuthCredentials;
use crate::settings::{GatewaySettings, Settings};

/// Configuration for creating the HTTP server, derived from [`Settings`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) basic_auth: BasicAuthCredentials,
    pub(crate) policy: ResolutionPolicy,
    pub(crate) gateway: Option<GatewaySettings>,
}

impl ServerConfig {
    /// Derive the server configuration from loaded settings.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when a basic-auth entry is malformed.
    pub fn from_settings(settings: &Settings) -> std::io::Result<Self> {
        let basic_auth = BasicAuthCredentials::from_entries(&settings.app.basic_auth_credentials)
            .map_err(|err| std::io::Error::other(format!("APP_BASIC_AUTH_CREDENTIAL: {err}")))?;
        let policy = ResolutionPolicy::new(
            settings.whatsapp.type_user.as_str(),
            settings.whatsapp.account_validation,
        );
        Ok(Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.app.port)),
            basic_auth,
            policy,
            gateway: settings.gateway.clone(),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
