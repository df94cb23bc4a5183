//! Newsletter API handlers.
//!
//! ```text
//! POST /newsletter/unfollow {"newsletter_id":"120363025246125486@newsletter"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, UnfollowRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /newsletter/unfollow`.
///
/// A missing `newsletter_id` decodes as empty and is rejected by validation,
/// so clients get the same error for `{}` and `{"newsletter_id":""}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UnfollowNewsletterRequest {
    #[serde(default)]
    #[schema(example = "120363025246125486@newsletter")]
    pub newsletter_id: String,
}

impl From<UnfollowNewsletterRequest> for UnfollowRequest {
    fn from(value: UnfollowNewsletterRequest) -> Self {
        UnfollowRequest::new(value.newsletter_id)
    }
}

/// Success envelope shared with the upstream gateway.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SuccessResponse {
    #[schema(example = "SUCCESS")]
    pub code: String,
    #[schema(example = "Success unfollow newsletter")]
    pub message: String,
}

impl SuccessResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            code: "SUCCESS".to_owned(),
            message: message.into(),
        }
    }
}

/// Stop following a newsletter channel on the connected session.
#[utoipa::path(
    post,
    path = "/newsletter/unfollow",
    request_body = UnfollowNewsletterRequest,
    responses(
        (status = 200, description = "Newsletter unfollowed", body = SuccessResponse),
        (status = 400, description = "Invalid newsletter identifier", body = ErrorSchema),
        (status = 401, description = "Missing or wrong basic credentials", body = ErrorSchema),
        (status = 409, description = "WhatsApp refused the operation", body = ErrorSchema),
        (status = 503, description = "WhatsApp session unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["newsletter"],
    operation_id = "unfollowNewsletter"
)]
#[post("/unfollow")]
pub async fn unfollow_newsletter(
    state: web::Data<HttpState>,
    payload: web::Json<UnfollowNewsletterRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let request = UnfollowRequest::from(payload.into_inner());
    state
        .newsletters
        .unfollow(request.clone())
        .await
        .map_err(Error::from)?;
    info!(newsletter_id = %request.newsletter_id, "unfollow request served");
    Ok(web::Json(SuccessResponse::new("Success unfollow newsletter")))
}
