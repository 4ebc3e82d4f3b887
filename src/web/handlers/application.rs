//! Job application handler.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::mail::{MailAttachment, MailBody, OutgoingMessage};
use crate::web::dto::{ApplicationRequest, JobApplication, MessageResponse};
use crate::web::error::{ApiError, INVALID_MULTIPART};
use crate::web::handlers::AppState;

/// Escape text for inclusion in an HTML body.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the notification for a job application.
pub fn application_message(
    mailbox: &str,
    application: &JobApplication,
    attachments: Vec<MailAttachment>,
) -> OutgoingMessage {
    let html = format!(
        "<h3>New Job Application</h3>\n\
         <p><strong>Job:</strong> {}</p>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>Note:</strong> All required documents attached.</p>\n",
        escape_html(&application.job_title),
        escape_html(&application.name),
        escape_html(&application.email),
        escape_html(&application.phone),
    );

    OutgoingMessage::to_service_mailbox(
        mailbox,
        application.email.clone(),
        format!(
            "Job Application: {} — {}",
            application.job_title, application.name
        ),
        MailBody::Html(html),
    )
    .with_attachments(attachments)
}

/// POST /apply-job - Relay a job application with its documents.
///
/// Request body: multipart/form-data with `name`, `email`, `phone`,
/// `jobTitle` and up to one file per document field.
pub async fn apply_job(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Rejected multipart request: {}", e);
        ApiError::bad_request(INVALID_MULTIPART)
    })?;

    let form = state.intake.receive(&mut multipart).await?;
    let storage = state.intake.storage();

    let req = ApplicationRequest::from_form(&form);
    tracing::info!(
        name = ?req.name,
        email = ?req.email,
        phone = ?req.phone,
        job_title = ?req.job_title,
        documents = form.documents.len(),
        "Job application data received"
    );

    // Documents are optional; only the scalar fields are required.
    if req.validate().is_err() {
        storage.release(form.documents.paths()).await;
        return Err(ApiError::missing_fields());
    }

    let application = req.into_application();
    let message = application_message(&state.mailbox, &application, form.documents.attachments());

    match state.mailer.send(message).await {
        Ok(()) => {
            storage.release(form.documents.paths()).await;
            tracing::info!("Job application email sent successfully");
            Ok(Json(MessageResponse::new("Application sent successfully")))
        }
        Err(e) => {
            tracing::error!("apply-job error: {}", e);
            if state.cleanup_on_failure {
                storage.release(form.documents.paths()).await;
            } else if !form.documents.is_empty() {
                tracing::warn!(
                    count = form.documents.len(),
                    "Leaving staged uploads in place after failed send"
                );
            }
            Err(ApiError::internal("Failed to process application"))
        }
    }
}
