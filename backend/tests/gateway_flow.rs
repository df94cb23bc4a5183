//! Full request path: HTTP handler, use-case and reqwest adapter against a
//! mock upstream gateway.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::{Value, json};
use url::Url;
use wa_gateway::domain::ResolutionPolicy;
use wa_gateway::inbound::http::basic_auth::BasicAuthCredentials;
use wa_gateway::inbound::http::health::HealthState;
use wa_gateway::outbound::whatsapp::GatewayWhatsappClient;
use wa_gateway::server::{AppDependencies, build_app, build_http_state};

async fn unfollow_via(server: &MockServer, newsletter_id: &str) -> (StatusCode, Value) {
    let base_url = Url::parse(&server.base_url()).expect("mock url");
    let client = GatewayWhatsappClient::new(base_url, Duration::from_secs(5)).expect("client");
    let http_state = build_http_state(Arc::new(client), ResolutionPolicy::default());
    let app = actix_test::init_service(build_app(AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        basic_auth: BasicAuthCredentials::default(),
    }))
    .await;

    let request = actix_test::TestRequest::post()
        .uri("/newsletter/unfollow")
        .set_json(json!({ "newsletter_id": newsletter_id }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

#[actix_web::test]
async fn unfollow_reaches_upstream_gateway() {
    let server = MockServer::start_async().await;
    let devices = server
        .mock_async(|when, then| {
            when.method(GET).path("/app/devices");
            then.status(200).json_body(json!({
                "code": "SUCCESS",
                "results": [{ "name": "Chrome", "device": "628@s.whatsapp.net" }],
            }));
        })
        .await;
    let unfollow = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/newsletter/unfollow")
                .json_body(json!({ "newsletter_id": "120363025246125486@newsletter" }));
            then.status(200)
                .json_body(json!({ "code": "SUCCESS", "results": null }));
        })
        .await;

    let (status, body) = unfollow_via(&server, " 120363025246125486@newsletter ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], json!("SUCCESS"));
    devices.assert_async().await;
    unfollow.assert_async().await;
}

#[actix_web::test]
async fn unpaired_gateway_never_receives_unfollow() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/app/devices");
            then.status(200).json_body(json!({ "code": "SUCCESS", "results": [] }));
        })
        .await;
    let unfollow = server
        .mock_async(|when, then| {
            when.method(POST).path("/newsletter/unfollow");
            then.status(200).json_body(json!({ "code": "SUCCESS" }));
        })
        .await;

    let (status, body) = unfollow_via(&server, "120363@newsletter").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], json!("service_unavailable"));
    unfollow.assert_hits_async(0).await;
}

#[actix_web::test]
async fn upstream_failure_is_redacted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/app/devices");
            then.status(200).json_body(json!({ "results": [{}] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/newsletter/unfollow");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let (status, body) = unfollow_via(&server, "120363@newsletter").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("Internal server error"));
}
