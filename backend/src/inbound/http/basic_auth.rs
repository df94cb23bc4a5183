//! HTTP basic authentication guard.
//!
//! Requests pass only when their `Authorization: Basic` header decodes to one
//! of the configured `user:password` pairs. With no pairs configured the guard
//! lets everything through.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE};
use actix_web::{Error as ActixError, ResponseError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::Error;

/// Errors raised while building the accepted credential list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasicAuthConfigError {
    /// An entry lacks the `user:password` shape.
    #[error("basic auth entry {index} must look like user:password")]
    MalformedEntry { index: usize },
}

type CredentialDigest = [u8; 32];

/// Accepted `user:password` pairs, held as SHA-256 digests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAuthCredentials {
    accepted: Vec<CredentialDigest>,
}

impl BasicAuthCredentials {
    /// Validate raw `user:password` entries.
    ///
    /// # Examples
    /// ```
    /// use wa_gateway::inbound::http::basic_auth::BasicAuthCredentials;
    ///
    /// let creds = BasicAuthCredentials::from_entries(&["admin:secret".to_owned()])
    ///     .expect("valid entries");
    /// assert!(!creds.is_empty());
    /// ```
    pub fn from_entries(entries: &[String]) -> Result<Self, BasicAuthConfigError> {
        let accepted = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry.split_once(':') {
                Some((user, _)) if !user.is_empty() => Ok(digest(entry.as_bytes())),
                _ => Err(BasicAuthConfigError::MalformedEntry { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { accepted })
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    fn authorizes(&self, header: Option<&HeaderValue>) -> bool {
        if self.is_empty() {
            return true;
        }
        let Some(decoded) = header.and_then(decode_basic) else {
            return false;
        };
        let presented = digest(&decoded);
        // Every entry is compared so timing does not reveal which one matched.
        self.accepted
            .iter()
            .fold(false, |matched, entry| digests_equal(entry, &presented) | matched)
    }
}

fn digest(bytes: &[u8]) -> CredentialDigest {
    Sha256::digest(bytes).into()
}

/// Compare digests without exiting at the first differing byte.
fn digests_equal(left: &CredentialDigest, right: &CredentialDigest) -> bool {
    left.iter()
        .zip(right.iter())
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn decode_basic(header: &HeaderValue) -> Option<Vec<u8>> {
    let value = header.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    STANDARD.decode(encoded.trim()).ok()
}

/// Middleware rejecting requests without accepted basic credentials.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use wa_gateway::inbound::http::basic_auth::{BasicAuth, BasicAuthCredentials};
///
/// let creds = BasicAuthCredentials::from_entries(&["admin:secret".to_owned()])
///     .expect("valid entries");
/// let _app = App::new().service(web::scope("/newsletter").wrap(BasicAuth::new(creds)));
/// ```
#[derive(Clone)]
pub struct BasicAuth {
    credentials: Arc<BasicAuthCredentials>,
}

impl BasicAuth {
    pub fn new(credentials: BasicAuthCredentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = BasicAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddleware {
            service,
            credentials: Arc::clone(&self.credentials),
        }))
    }
}

/// Service wrapper produced by [`BasicAuth`].
pub struct BasicAuthMiddleware<S> {
    service: S,
    credentials: Arc<BasicAuthCredentials>,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.credentials.authorizes(req.headers().get(AUTHORIZATION)) {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        debug!(path = %req.path(), "rejected request without accepted basic credentials");
        Box::pin(async move {
            // Built inside the future so the request's trace id is in scope.
            let error = Error::unauthorized("missing or invalid basic credentials");
            let mut response = error.error_response();
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"wa-gateway\""),
            );
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
