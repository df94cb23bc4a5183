//! Resolution of raw identifiers into JIDs on a logged-in session.
//!
//! Resolution gates every outbound action: the session must be logged in
//! before the identifier is even parsed, and bare user addresses may be
//! checked against the WhatsApp directory.

use thiserror::Error;
use tracing::debug;

use super::jid::{Jid, JidValidationError};
use super::ports::{SessionState, WhatsappClient, WhatsappClientError};

/// Server part used for user accounts when none is given.
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";

/// Rules applied while resolving identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPolicy {
    default_user_server: String,
    account_validation: bool,
}

impl ResolutionPolicy {
    /// Build a policy from a user server suffix and the account check flag.
    ///
    /// A leading `@` on the suffix is accepted, matching the
    /// `WHATSAPP_TYPE_USER` setting format.
    ///
    /// # Examples
    /// ```
    /// use wa_gateway::domain::ResolutionPolicy;
    ///
    /// let policy = ResolutionPolicy::new("@s.whatsapp.net", true);
    /// assert_eq!(policy.default_user_server(), "s.whatsapp.net");
    /// ```
    pub fn new(default_user_server: impl Into<String>, account_validation: bool) -> Self {
        let server = default_user_server.into();
        let server = server.trim().trim_start_matches('@').to_owned();
        Self {
            default_user_server: server,
            account_validation,
        }
    }

    pub fn default_user_server(&self) -> &str {
        self.default_user_server.as_str()
    }

    pub fn account_validation(&self) -> bool {
        self.account_validation
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_USER_SERVER, true)
    }
}

/// Reasons an identifier could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JidResolutionError {
    #[error("whatsapp session is not connected")]
    NotConnected,
    #[error("whatsapp session is not logged in")]
    NotLoggedIn,
    /// The session state could not be read.
    #[error("could not read whatsapp session state: {0}")]
    Session(#[source] WhatsappClientError),
    #[error("invalid jid: {0}")]
    InvalidJid(#[source] JidValidationError),
    #[error("{jid} is not registered on whatsapp")]
    NotOnWhatsapp { jid: String },
    /// The directory lookup for the account failed.
    #[error("could not check whatsapp account: {0}")]
    AccountCheck(#[source] WhatsappClientError),
}

/// Resolve `raw` into a [`Jid`], requiring a logged-in session.
///
/// Newsletter and group addresses skip the account check; only JIDs on the
/// default user server are looked up, and only when the policy asks for it.
pub async fn resolve_jid_with_login<C>(
    client: &C,
    raw: &str,
    policy: &ResolutionPolicy,
) -> Result<Jid, JidResolutionError>
where
    C: WhatsappClient + ?Sized,
{
    match client
        .session_state()
        .await
        .map_err(JidResolutionError::Session)?
    {
        SessionState::Disconnected => return Err(JidResolutionError::NotConnected),
        SessionState::Connected => return Err(JidResolutionError::NotLoggedIn),
        SessionState::LoggedIn => {}
    }

    let jid = Jid::parse(raw, policy.default_user_server())
        .map_err(JidResolutionError::InvalidJid)?;

    if policy.account_validation() && jid.server() == policy.default_user_server() {
        let registered = client
            .is_on_whatsapp(&jid)
            .await
            .map_err(JidResolutionError::AccountCheck)?;
        if !registered {
            return Err(JidResolutionError::NotOnWhatsapp {
                jid: jid.to_string(),
            });
        }
    }

    debug!(jid = %jid, "resolved jid");
    Ok(jid)
}

#[cfg(test)]
mod tests {
    //! Covers the session gate, parsing and the account check.
    use super::*;
    use crate::domain::ports::MockWhatsappClient;
    use rstest::rstest;

    fn logged_in_client() -> MockWhatsappClient {
        let mut client = MockWhatsappClient::new();
        client
            .expect_session_state()
            .times(1)
            .return_once(|| Ok(SessionState::LoggedIn));
        client
    }

    #[rstest]
    #[case(SessionState::Disconnected, JidResolutionError::NotConnected)]
    #[case(SessionState::Connected, JidResolutionError::NotLoggedIn)]
    #[tokio::test]
    async fn rejects_sessions_that_are_not_logged_in(
        #[case] state: SessionState,
        #[case] expected: JidResolutionError,
    ) {
        let mut client = MockWhatsappClient::new();
        client
            .expect_session_state()
            .times(1)
            .return_once(move || Ok(state));
        client.expect_is_on_whatsapp().times(0);

        let result =
            resolve_jid_with_login(&client, "628123", &ResolutionPolicy::default()).await;

        assert_eq!(result, Err(expected));
    }

    #[rstest]
    #[tokio::test]
    async fn propagates_session_errors() {
        let mut client = MockWhatsappClient::new();
        client
            .expect_session_state()
            .times(1)
            .return_once(|| Err(WhatsappClientError::unavailable("connection refused")));

        let result =
            resolve_jid_with_login(&client, "628123", &ResolutionPolicy::default()).await;

        assert_eq!(
            result,
            Err(JidResolutionError::Session(WhatsappClientError::unavailable(
                "connection refused"
            )))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn reports_unparseable_identifiers() {
        let mut client = logged_in_client();
        client.expect_is_on_whatsapp().times(0);

        let result = resolve_jid_with_login(&client, "123@", &ResolutionPolicy::default()).await;

        assert!(matches!(result, Err(JidResolutionError::InvalidJid(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn newsletter_addresses_skip_account_check() {
        let mut client = logged_in_client();
        client.expect_is_on_whatsapp().times(0);

        let jid = resolve_jid_with_login(
            &client,
            "120363025246125486@newsletter",
            &ResolutionPolicy::default(),
        )
        .await
        .expect("resolved");

        assert_eq!(jid.server(), "newsletter");
    }

    #[rstest]
    #[case(true, Ok(()))]
    #[case(false, Err(()))]
    #[tokio::test]
    async fn user_addresses_are_checked(
        #[case] registered: bool,
        #[case] expected: Result<(), ()>,
    ) {
        let mut client = logged_in_client();
        client
            .expect_is_on_whatsapp()
            .withf(|jid| jid.to_string() == "628123@s.whatsapp.net")
            .times(1)
            .return_once(move |_| Ok(registered));

        let result =
            resolve_jid_with_login(&client, "+628123", &ResolutionPolicy::default()).await;

        match expected {
            Ok(()) => assert_eq!(
                result.map(|jid| jid.to_string()),
                Ok("628123@s.whatsapp.net".to_owned())
            ),
            Err(()) => assert_eq!(
                result,
                Err(JidResolutionError::NotOnWhatsapp {
                    jid: "628123@s.whatsapp.net".to_owned()
                })
            ),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn account_check_can_be_disabled() {
        let mut client = logged_in_client();
        client.expect_is_on_whatsapp().times(0);
        let policy = ResolutionPolicy::new("@s.whatsapp.net", false);

        let jid = resolve_jid_with_login(&client, "628123", &policy)
            .await
            .expect("resolved");

        assert_eq!(jid.user(), "628123");
    }

    #[rstest]
    #[tokio::test]
    async fn account_check_failures_are_wrapped() {
        let mut client = logged_in_client();
        client
            .expect_is_on_whatsapp()
            .times(1)
            .return_once(|_| Err(WhatsappClientError::timeout("deadline elapsed")));

        let result =
            resolve_jid_with_login(&client, "628123", &ResolutionPolicy::default()).await;

        assert_eq!(
            result,
            Err(JidResolutionError::AccountCheck(WhatsappClientError::timeout(
                "deadline elapsed"
            )))
        );
    }
}
