//! Request-independent services used by the route handlers.

pub mod admin_bootstrap;
pub mod media;

pub use admin_bootstrap::bootstrap_admin;
pub use media::{read_upload_form, StagedFile, UploadForm};
