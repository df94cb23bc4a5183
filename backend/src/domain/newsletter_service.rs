//! Newsletter domain service.
//!
//! Implements [`NewsletterCommand`] on top of a shared [`WhatsappClient`].
//! The flow is strictly linear: validation gates resolution, and resolution
//! gates the single unfollow call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{NewsletterCommand, WhatsappClient};
use crate::domain::{
    ResolutionPolicy, UnfollowNewsletterError, UnfollowRequest, resolve_jid_with_login,
    validate_unfollow_newsletter,
};

/// Newsletter service implementing the driving port.
pub struct NewsletterService<C: ?Sized> {
    client: Arc<C>,
    policy: ResolutionPolicy,
}

impl<C: ?Sized> NewsletterService<C> {
    /// Create a new service around a shared client handle.
    pub fn new(client: Arc<C>, policy: ResolutionPolicy) -> Self {
        Self { client, policy }
    }
}

impl<C: ?Sized> Clone for NewsletterService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            policy: self.policy.clone(),
        }
    }
}

#[async_trait]
impl<C> NewsletterCommand for NewsletterService<C>
where
    C: WhatsappClient + ?Sized,
{
    async fn unfollow(&self, request: UnfollowRequest) -> Result<(), UnfollowNewsletterError> {
        validate_unfollow_newsletter(&request)?;

        let jid =
            resolve_jid_with_login(self.client.as_ref(), &request.newsletter_id, &self.policy)
                .await
                .inspect_err(|err| {
                    warn!(
                        newsletter_id = %request.newsletter_id,
                        error = %err,
                        "jid resolution failed"
                    );
                })?;

        self.client
            .unfollow_newsletter(&jid)
            .await
            .inspect_err(|err| warn!(jid = %jid, error = %err, "unfollow newsletter failed"))?;

        info!(jid = %jid, "unfollowed newsletter");
        Ok(())
    }
}

#[cfg(test)]
#[path = "newsletter_service_tests.rs"]
mod tests;
