//! Newsletter use-case types.
//!
//! Purpose: carry the unfollow request from inbound adapters to the service
//! and describe every way the use-case can fail. Each failure class keeps
//! the original error value so callers can match on it exactly.

mod validation;

use serde_json::json;
use thiserror::Error;

use super::jid_resolution::JidResolutionError;
use super::ports::WhatsappClientError;
use super::Error;

pub use validation::{NewsletterValidationError, validate_unfollow_newsletter};

/// Request to stop following a newsletter channel.
///
/// The identifier is opaque at this layer; only its presence is checked.
///
/// # Examples
/// ```
/// use wa_gateway::domain::UnfollowRequest;
///
/// let request = UnfollowRequest::new("120363025246125486@newsletter");
/// assert_eq!(request.newsletter_id, "120363025246125486@newsletter");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnfollowRequest {
    pub newsletter_id: String,
}

impl UnfollowRequest {
    pub fn new(newsletter_id: impl Into<String>) -> Self {
        Self {
            newsletter_id: newsletter_id.into(),
        }
    }
}

/// Failures of the unfollow use-case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnfollowNewsletterError {
    /// The request failed validation; the client was not contacted.
    #[error(transparent)]
    Validation(#[from] NewsletterValidationError),
    /// The identifier could not be resolved on the current session.
    #[error(transparent)]
    Resolution(#[from] JidResolutionError),
    /// The client failed while unfollowing.
    #[error(transparent)]
    Client(#[from] WhatsappClientError),
}

fn client_error_to_domain(error: &WhatsappClientError) -> Error {
    match error {
        WhatsappClientError::Unavailable { .. } | WhatsappClientError::Timeout { .. } => {
            Error::service_unavailable(error.to_string())
        }
        WhatsappClientError::Rejected { .. } => Error::conflict(error.to_string()),
        WhatsappClientError::Decode { .. } => Error::internal(error.to_string()),
    }
}

fn resolution_error_to_domain(error: &JidResolutionError) -> Error {
    match error {
        JidResolutionError::NotConnected | JidResolutionError::NotLoggedIn => {
            Error::service_unavailable(error.to_string())
        }
        JidResolutionError::InvalidJid(_) => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "newsletter_id", "code": "invalid_jid" })),
        JidResolutionError::NotOnWhatsapp { .. } => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "newsletter_id", "code": "not_on_whatsapp" })),
        JidResolutionError::Session(inner) | JidResolutionError::AccountCheck(inner) => {
            client_error_to_domain(inner)
        }
    }
}

impl From<UnfollowNewsletterError> for Error {
    fn from(value: UnfollowNewsletterError) -> Self {
        match &value {
            UnfollowNewsletterError::Validation(err) => err.to_domain_error(),
            UnfollowNewsletterError::Resolution(err) => resolution_error_to_domain(err),
            UnfollowNewsletterError::Client(err) => client_error_to_domain(err),
        }
    }
}
