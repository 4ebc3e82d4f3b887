//! Web API module for formrelay.
//!
//! Two endpoints relay submissions by email: `/send-email` for the contact
//! form (JSON) and `/apply-job` for job applications (multipart with
//! document uploads).

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
