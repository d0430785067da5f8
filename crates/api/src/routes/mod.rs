//! HTTP route handlers.

use serde::Serialize;

pub mod admin_users;
pub mod announcements;
pub mod app_configs;
pub mod banners;
pub mod changelogs;
pub mod health;
pub mod public;
pub mod terms;
pub mod versions;

/// Rows touched by a batch status change.
#[derive(Debug, Serialize)]
pub struct AffectedResponse {
    pub affected: u64,
}
