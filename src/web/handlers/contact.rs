//! Contact form handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::mail::{MailBody, OutgoingMessage};
use crate::web::dto::{ContactRequest, ContactSubmission, MessageResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Build the notification for a contact form submission.
pub fn contact_message(mailbox: &str, submission: &ContactSubmission) -> OutgoingMessage {
    OutgoingMessage::to_service_mailbox(
        mailbox,
        submission.email.clone(),
        format!("New Contact Form Submission from {}", submission.name),
        MailBody::Text(format!(
            "Name: {}\nEmail: {}\nMessage: {}",
            submission.name, submission.email, submission.message
        )),
    )
}

/// POST /send-email - Relay a contact form submission.
pub async fn send_contact_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let submission = req.into_submission();
    tracing::info!(
        name = %submission.name,
        email = %submission.email,
        "Contact form data received"
    );

    let message = contact_message(&state.mailbox, &submission);

    state.mailer.send(message).await.map_err(|e| {
        tracing::error!("Error sending email: {}", e);
        ApiError::internal("Failed to send email")
    })?;

    tracing::info!("Email sent successfully");
    Ok(Json(MessageResponse::new("Email sent successfully")))
}
