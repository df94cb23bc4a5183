//! Domain primitives, ports and use-cases.
//!
//! Purpose: keep newsletter rules independent of HTTP and of the concrete
//! WhatsApp client. Types are immutable once built; invariants live in each
//! type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - Jid: canonical `user@server` address.
//! - UnfollowRequest and validate_unfollow_newsletter: request shape checks.
//! - resolve_jid_with_login: session gate plus identifier resolution.
//! - NewsletterService: the [`ports::NewsletterCommand`] implementation.

pub mod error;
pub mod jid;
pub mod jid_resolution;
pub mod newsletter;
pub mod newsletter_service;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::jid::{Jid, JidValidationError};
pub use self::jid_resolution::{
    DEFAULT_USER_SERVER, JidResolutionError, ResolutionPolicy, resolve_jid_with_login,
};
pub use self::newsletter::{
    NewsletterValidationError, UnfollowNewsletterError, UnfollowRequest,
    validate_unfollow_newsletter,
};
pub use self::newsletter_service::NewsletterService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

