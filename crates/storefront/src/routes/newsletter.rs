//! Newsletter subscription route handlers.

use axum::{Json, extract::rejection::JsonRejection};
use satwa_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, MessageBody, Result};

/// Newsletter subscription data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Subscribe an address to the newsletter.
///
/// POST /api/newsletter
#[instrument(skip_all)]
pub async fn subscribe(
    payload: std::result::Result<Json<SubscribeForm>, JsonRejection>,
) -> Result<Json<MessageBody>> {
    let Json(form) = payload?;

    let email = Email::parse(&form.email.to_lowercase())
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))?;

    tracing::info!(email = %email, "Newsletter subscription");
    Ok(Json(MessageBody::new("Successfully subscribed to newsletter")))
}
