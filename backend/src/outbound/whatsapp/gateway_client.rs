//! Reqwest-backed WhatsApp client adapter.
//!
//! This adapter owns transport details only: basic auth, timeout and HTTP
//! error mapping, and JSON decoding of the gateway envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{DevicesDto, EnvelopeDto, UnfollowNewsletterDto, UserCheckDto};
use crate::domain::Jid;
use crate::domain::ports::{SessionState, WhatsappClient, WhatsappClientError};

/// WhatsApp client adapter that calls an upstream REST gateway.
pub struct GatewayWhatsappClient {
    client: Client,
    base_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl GatewayWhatsappClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            credentials: None,
        })
    }

    /// Send HTTP basic credentials with every request.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password));
        self
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        match &self.credentials {
            Some((username, password)) => builder.basic_auth(username, password.as_deref()),
            None => builder,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T>(&self, builder: RequestBuilder) -> Result<Option<T>, WhatsappClientError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(builder)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_results(body.as_ref())
    }
}

#[async_trait]
impl WhatsappClient for GatewayWhatsappClient {
    async fn session_state(&self) -> Result<SessionState, WhatsappClientError> {
        let devices: Option<DevicesDto> = self
            .send(self.client.get(self.endpoint("/app/devices")))
            .await?;
        let paired = devices.map_or(0, |devices| devices.len());
        debug!(paired, "gateway session state");
        Ok(if paired > 0 {
            SessionState::LoggedIn
        } else {
            SessionState::Connected
        })
    }

    async fn is_on_whatsapp(&self, jid: &Jid) -> Result<bool, WhatsappClientError> {
        let builder = self
            .client
            .get(self.endpoint("/user/check"))
            .query(&[("phone", jid.user())]);
        let check: Option<UserCheckDto> = self.send(builder).await?;
        check
            .map(|check| check.is_on_whatsapp)
            .ok_or_else(|| WhatsappClientError::decode("user check response has no results"))
    }

    async fn unfollow_newsletter(&self, jid: &Jid) -> Result<(), WhatsappClientError> {
        let newsletter_id = jid.to_string();
        let builder = self
            .client
            .post(self.endpoint("/newsletter/unfollow"))
            .json(&UnfollowNewsletterDto {
                newsletter_id: newsletter_id.as_str(),
            });
        self.send::<serde_json::Value>(builder).await?;
        Ok(())
    }
}

fn parse_results<T>(body: &[u8]) -> Result<Option<T>, WhatsappClientError>
where
    T: DeserializeOwned,
{
    let envelope: EnvelopeDto<T> = serde_json::from_slice(body).map_err(|error| {
        WhatsappClientError::decode(format!("invalid gateway JSON payload: {error}"))
    })?;
    Ok(envelope.results)
}

fn map_transport_error(error: reqwest::Error) -> WhatsappClientError {
    if error.is_timeout() {
        WhatsappClientError::timeout(error.to_string())
    } else {
        WhatsappClientError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WhatsappClientError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            WhatsappClientError::timeout(message)
        }
        _ if status.is_client_error() => WhatsappClientError::rejected(message),
        _ => WhatsappClientError::unavailable(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
