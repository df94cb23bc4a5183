//! Request validation for newsletter use-cases.

use serde_json::json;
use thiserror::Error;

use super::UnfollowRequest;
use crate::domain::Error;

/// Validation failures for newsletter requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsletterValidationError {
    /// A required field was empty or whitespace-only.
    #[error("{field}: cannot be blank")]
    MissingField { field: &'static str },
}

impl NewsletterValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
        }
    }

    pub(crate) fn to_domain_error(&self) -> Error {
        match self {
            Self::MissingField { field } => Error::invalid_request(self.to_string())
                .with_details(json!({ "field": field, "code": "missing_field" })),
        }
    }
}

/// Check that an unfollow request names a newsletter.
///
/// Pure and free of I/O; the identifier format is left to resolution.
///
/// # Examples
/// ```
/// use wa_gateway::domain::{UnfollowRequest, validate_unfollow_newsletter};
///
/// assert!(validate_unfollow_newsletter(&UnfollowRequest::new("120363@newsletter")).is_ok());
/// let err = validate_unfollow_newsletter(&UnfollowRequest::new(" ")).unwrap_err();
/// assert_eq!(err.to_string(), "newsletter_id: cannot be blank");
/// ```
pub fn validate_unfollow_newsletter(
    request: &UnfollowRequest,
) -> Result<(), NewsletterValidationError> {
    if request.newsletter_id.trim().is_empty() {
        return Err(NewsletterValidationError::MissingField {
            field: "newsletter_id",
        });
    }
    Ok(())
}
