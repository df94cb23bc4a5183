//! Driving port for newsletter use-cases.
//!
//! Inbound adapters call this port to act on newsletter channels without
//! knowing which WhatsApp client backs the session.

use async_trait::async_trait;

use crate::domain::{UnfollowNewsletterError, UnfollowRequest};

/// Domain use-case port for newsletter subscriptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsletterCommand: Send + Sync {
    /// Stop following the newsletter named in `request`.
    async fn unfollow(&self, request: UnfollowRequest) -> Result<(), UnfollowNewsletterError>;
}
