//! Tests for the newsletter service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockWhatsappClient, SessionState, WhatsappClientError};
use crate::domain::{JidResolutionError, NewsletterValidationError};
use rstest::rstest;

const NEWSLETTER: &str = "120363025246125486@newsletter";

fn make_service(client: MockWhatsappClient) -> NewsletterService<MockWhatsappClient> {
    NewsletterService::new(Arc::new(client), ResolutionPolicy::default())
}

fn logged_in(client: &mut MockWhatsappClient) {
    client
        .expect_session_state()
        .times(1)
        .return_once(|| Ok(SessionState::LoggedIn));
}

#[rstest]
#[tokio::test]
async fn unfollow_calls_client_once_with_resolved_jid() {
    let mut client = MockWhatsappClient::new();
    logged_in(&mut client);
    client.expect_is_on_whatsapp().times(0);
    client
        .expect_unfollow_newsletter()
        .withf(|jid| jid.to_string() == NEWSLETTER)
        .times(1)
        .return_once(|_| Ok(()));

    let result = make_service(client)
        .unfollow(UnfollowRequest::new(NEWSLETTER))
        .await;

    assert_eq!(result, Ok(()));
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn blank_identifier_never_reaches_client(#[case] id: &str) {
    let mut client = MockWhatsappClient::new();
    client.expect_session_state().times(0);
    client.expect_is_on_whatsapp().times(0);
    client.expect_unfollow_newsletter().times(0);

    let result = make_service(client).unfollow(UnfollowRequest::new(id)).await;

    assert_eq!(
        result,
        Err(UnfollowNewsletterError::Validation(
            NewsletterValidationError::MissingField {
                field: "newsletter_id"
            }
        ))
    );
}

#[rstest]
#[case(SessionState::Disconnected, JidResolutionError::NotConnected)]
#[case(SessionState::Connected, JidResolutionError::NotLoggedIn)]
#[tokio::test]
async fn resolution_failure_skips_unfollow(
    #[case] state: SessionState,
    #[case] expected: JidResolutionError,
) {
    let mut client = MockWhatsappClient::new();
    client
        .expect_session_state()
        .times(1)
        .return_once(move || Ok(state));
    client.expect_unfollow_newsletter().times(0);

    let result = make_service(client)
        .unfollow(UnfollowRequest::new(NEWSLETTER))
        .await;

    assert_eq!(result, Err(UnfollowNewsletterError::Resolution(expected)));
}

#[rstest]
#[tokio::test]
async fn unregistered_account_skips_unfollow() {
    let mut client = MockWhatsappClient::new();
    logged_in(&mut client);
    client
        .expect_is_on_whatsapp()
        .times(1)
        .return_once(|_| Ok(false));
    client.expect_unfollow_newsletter().times(0);

    let result = make_service(client)
        .unfollow(UnfollowRequest::new("628123"))
        .await;

    assert_eq!(
        result,
        Err(UnfollowNewsletterError::Resolution(
            JidResolutionError::NotOnWhatsapp {
                jid: "628123@s.whatsapp.net".to_owned()
            }
        ))
    );
}

#[rstest]
#[case(WhatsappClientError::rejected("not following"))]
#[case(WhatsappClientError::timeout("deadline elapsed"))]
#[case(WhatsappClientError::unavailable("connection reset"))]
#[tokio::test]
async fn client_errors_are_returned_unchanged(#[case] error: WhatsappClientError) {
    let mut client = MockWhatsappClient::new();
    logged_in(&mut client);
    let returned = error.clone();
    client
        .expect_unfollow_newsletter()
        .times(1)
        .return_once(move |_| Err(returned));

    let result = make_service(client)
        .unfollow(UnfollowRequest::new(NEWSLETTER))
        .await;

    assert_eq!(result, Err(UnfollowNewsletterError::Client(error)));
}
