//! Web API Job Application Tests
//!
//! Integration tests for `POST /apply-job`: document intake, delivery and
//! cleanup of staged uploads.

mod common;

use std::future::IntoFuture;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use common::{create_test_server, create_test_server_with, RecordingMailer, SERVICE_MAILBOX};
use formrelay::upload::DEFAULT_MAX_FILE_SIZE;
use formrelay::MailBody;

/// A form with all four scalar fields.
fn application_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("name", "Ravi Kumar")
        .add_text("email", "ravi@example.com")
        .add_text("phone", "+91 98765 43210")
        .add_text("jobTitle", "Electrician")
}

/// A file part with the given name and size.
fn file_part(filename: &str, size: usize, mime: &str) -> Part {
    Part::bytes(vec![0x42u8; size])
        .file_name(filename)
        .mime_type(mime)
}

fn png(filename: &str) -> Part {
    file_part(filename, 10, "image/png")
}

// ============================================================================
// Delivery Tests
// ============================================================================

#[tokio::test]
async fn test_apply_with_photo_success() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form().add_part("photo", png("photo.png"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Application sent successfully" }));

    let attempts = ctx.mailer.attempts();
    assert_eq!(attempts.len(), 1);

    let sent = &attempts[0];
    assert!(sent.attachments_on_disk);
    assert_eq!(sent.message.attachments.len(), 1);
    assert_eq!(sent.message.attachments[0].filename, "photo.png");
    assert_eq!(sent.message.subject, "Job Application: Electrician — Ravi Kumar");
    assert_eq!(sent.message.reply_to, "ravi@example.com");
    assert_eq!(sent.message.from, SERVICE_MAILBOX);
    assert_eq!(sent.message.to, SERVICE_MAILBOX);
    assert!(matches!(sent.message.body, MailBody::Html(_)));
    assert!(sent.message.body.content().contains("+91 98765 43210"));

    // Staged file removed after sending
    assert!(!sent.message.attachments[0].path.exists());
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_apply_without_documents() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let response = ctx
        .server
        .post("/apply-job")
        .multipart(application_form())
        .await;

    response.assert_status_ok();

    let attempts = ctx.mailer.attempts();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].message.attachments.is_empty());
}

#[tokio::test]
async fn test_attachments_follow_field_registration_order() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form()
        .add_part("birth_certificate", file_part("birth.pdf", 20, "application/pdf"))
        .add_part("pan", png("pan.png"))
        .add_part("passport_front", file_part("front.JPG", 20, "image/jpeg"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status_ok();

    let attempts = ctx.mailer.attempts();
    let filenames: Vec<&str> = attempts[0]
        .message
        .attachments
        .iter()
        .map(|a| a.filename.as_str())
        .collect();
    assert_eq!(filenames, vec!["front.JPG", "pan.png", "birth.pdf"]);
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_stored_name_replaces_whitespace() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form().add_part("education", png("my degree  scan.png"));
    ctx.server
        .post("/apply-job")
        .multipart(form)
        .await
        .assert_status_ok();

    let attempts = ctx.mailer.attempts();
    let attachment = &attempts[0].message.attachments[0];
    assert_eq!(attachment.filename, "my degree  scan.png");
    assert!(attachment
        .path
        .to_string_lossy()
        .ends_with("-my_degree_scan.png"));
    assert_eq!(attachment.path.parent().unwrap(), ctx.upload_dir.path());
}

#[tokio::test]
async fn test_long_filename_is_shortened_on_disk() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let long_name = format!("{}.png", "a".repeat(240));
    let form = application_form().add_part("photo", png(&long_name));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Application sent successfully" }));

    let attempts = ctx.mailer.attempts();
    let attachment = &attempts[0].message.attachments[0];
    assert_eq!(attachment.filename, long_name);
    assert!(attempts[0].attachments_on_disk);

    let stored_name = attachment.path.file_name().unwrap().to_string_lossy().to_string();
    assert!(stored_name.len() < 255);
    assert!(stored_name.ends_with(".png"));
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_send_failure_leaves_staged_files() {
    let ctx = create_test_server(RecordingMailer::failing());

    let form = application_form()
        .add_part("photo", png("photo.png"))
        .add_part("pan", png("pan.png"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "message": "Failed to process application" }));

    assert_eq!(ctx.mailer.attempts().len(), 1);
    assert_eq!(ctx.staged_files().len(), 2);
}

#[tokio::test]
async fn test_send_failure_with_cleanup_enabled() {
    let ctx = create_test_server_with(RecordingMailer::failing(), DEFAULT_MAX_FILE_SIZE, true);

    let form = application_form().add_part("photo", png("photo.png"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_concurrent_identical_names_do_not_collide() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let first = ctx
        .server
        .post("/apply-job")
        .multipart(application_form().add_part("photo", png("photo.png")))
        .into_future();
    let second = ctx
        .server
        .post("/apply-job")
        .multipart(application_form().add_part("photo", png("photo.png")))
        .into_future();

    let (r1, r2) = tokio::join!(first, second);
    r1.assert_status_ok();
    r2.assert_status_ok();

    let attempts = ctx.mailer.attempts();
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().all(|a| a.attachments_on_disk));
    assert_ne!(
        attempts[0].message.attachments[0].path,
        attempts[1].message.attachments[0].path
    );
    assert!(ctx.staged_files().is_empty());
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
async fn test_missing_scalar_fields_rejected() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = MultipartForm::new()
        .add_text("name", "Ravi Kumar")
        .add_text("email", "ravi@example.com")
        .add_text("phone", "")
        .add_text("jobTitle", "Electrician")
        .add_part("photo", png("photo.png"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "message": "Missing required fields" }));

    assert!(ctx.mailer.attempts().is_empty());
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_missing_job_title_rejected() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = MultipartForm::new()
        .add_text("name", "Ravi Kumar")
        .add_text("email", "ravi@example.com")
        .add_text("phone", "123");
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "message": "Missing required fields" }));
}

#[tokio::test]
async fn test_exe_rejected_before_handler() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form().add_part(
        "photo",
        file_part("setup.exe", 10, "application/octet-stream"),
    );
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Only .pdf, .jpg, .jpeg, .png allowed");

    assert!(ctx.mailer.attempts().is_empty());
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_bad_file_discards_earlier_uploads() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form()
        .add_part("photo", png("photo.png"))
        .add_part("education", png("degree.png"))
        .add_part("pan", file_part("pan.gif", 10, "image/gif"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.mailer.attempts().is_empty());
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_file_at_size_limit_accepted() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let size = 6 * 1024 * 1024;
    let form = application_form().add_part("education", file_part("degree.pdf", size, "application/pdf"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(ctx.mailer.attempts().len(), 1);
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_file_over_size_limit_rejected() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let size = 6 * 1024 * 1024 + 1;
    let form = application_form().add_part("education", file_part("degree.pdf", size, "application/pdf"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "message": "File too large" }));

    assert!(ctx.mailer.attempts().is_empty());
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_custom_size_limit() {
    let ctx = create_test_server_with(RecordingMailer::accepting(), 16, false);

    let form = application_form().add_part("photo", file_part("photo.png", 16, "image/png"));
    ctx.server
        .post("/apply-job")
        .multipart(form)
        .await
        .assert_status_ok();

    let form = application_form().add_part("photo", file_part("photo.png", 17, "image/png"));
    ctx.server
        .post("/apply-job")
        .multipart(form)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(ctx.mailer.attempts().len(), 1);
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_unknown_file_field_rejected() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form()
        .add_part("photo", png("photo.png"))
        .add_part("resume", file_part("cv.pdf", 10, "application/pdf"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "message": "Unexpected field" }));
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_second_file_for_field_rejected() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let form = application_form()
        .add_part("photo", png("photo1.png"))
        .add_part("photo", png("photo2.png"));
    let response = ctx.server.post("/apply-job").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "message": "Unexpected field" }));
    assert!(ctx.mailer.attempts().is_empty());
    assert!(ctx.staged_files().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_rejected() {
    let ctx = create_test_server(RecordingMailer::accepting());

    let response = ctx
        .server
        .post("/apply-job")
        .json(&json!({ "name": "Ravi" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "message": "Invalid multipart data" }));
}
