//! Driven port for the external WhatsApp client.
//!
//! The client owns the protocol session. The domain only asks whether the
//! session is usable, whether an account exists, and asks it to act on a
//! newsletter. Adapters map transport failures into
//! [`WhatsappClientError`] variants so use-cases can classify them.

use async_trait::async_trait;

use crate::domain::Jid;

use super::define_port_error;

/// Authentication state of the external client's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection to the WhatsApp servers.
    Disconnected,
    /// Connected but no device is paired.
    Connected,
    /// Connected with a paired device.
    LoggedIn,
}

define_port_error! {
    /// Errors raised by WhatsApp client adapters.
    pub enum WhatsappClientError {
        /// The client or the gateway in front of it could not be reached.
        Unavailable => "whatsapp client unavailable: {message}",
        /// The client did not answer in time.
        Timeout => "whatsapp client timed out: {message}",
        /// The client refused the operation.
        Rejected => "whatsapp client rejected the request: {message}",
        /// The client answered with a payload that could not be decoded.
        Decode => "whatsapp client response could not be decoded: {message}",
    }
}

/// Port for the operations the domain needs from the WhatsApp client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WhatsappClient: Send + Sync {
    /// Report whether the session is connected and logged in.
    async fn session_state(&self) -> Result<SessionState, WhatsappClientError>;

    /// Check that `jid` belongs to a registered WhatsApp account.
    async fn is_on_whatsapp(&self, jid: &Jid) -> Result<bool, WhatsappClientError>;

    /// Stop following the newsletter addressed by `jid`.
    async fn unfollow_newsletter(&self, jid: &Jid) -> Result<(), WhatsappClientError>;
}

/// In-memory client used when no upstream gateway is configured.
///
/// The session is always logged in, every account exists and unfollowing
/// always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWhatsappClient;

#[async_trait]
impl WhatsappClient for FixtureWhatsappClient {
    async fn session_state(&self) -> Result<SessionState, WhatsappClientError> {
        Ok(SessionState::LoggedIn)
    }

    async fn is_on_whatsapp(&self, _jid: &Jid) -> Result<bool, WhatsappClientError> {
        Ok(true)
    }

    async fn unfollow_newsletter(&self, _jid: &Jid) -> Result<(), WhatsappClientError> {
        Ok(())
    }
}
