//! DTOs for the upstream gateway's JSON envelope.
//!
//! Every gateway response is wrapped as `{code, message, results}`; only the
//! `results` shapes the adapter reads are modelled.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Paired devices are only counted, never inspected.
pub(super) type DevicesDto = Vec<IgnoredAny>;

#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeDto<T> {
    pub(super) results: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserCheckDto {
    pub(super) is_on_whatsapp: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct UnfollowNewsletterDto<'a> {
    pub(super) newsletter_id: &'a str,
}
