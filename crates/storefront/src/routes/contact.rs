//! Contact form route handlers.

use axum::{
    Json,
    extract::rejection::JsonRejection,
};
use satwa_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, MessageBody, Result};

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Accept a contact form submission.
///
/// POST /api/contact
#[instrument(skip_all)]
pub async fn submit(
    payload: std::result::Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<MessageBody>> {
    let Json(form) = payload?;

    let email = Email::parse(&form.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))?;
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and message are required.".to_string(),
        ));
    }

    tracing::info!(
        email = %email,
        subject = %form.subject.trim(),
        "Contact form submission"
    );
    Ok(Json(MessageBody::new("Message sent successfully")))
}
