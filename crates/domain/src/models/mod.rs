//! Domain models for the helper admin service.

pub mod admin_user;
pub mod announcement;
pub mod app_config;
pub mod banner;
pub mod changelog;
pub mod patch;
pub mod platform;
pub mod status;
pub mod term;
pub mod version;

pub use admin_user::{AdminGroup, AdminUser};
pub use announcement::Announcement;
pub use app_config::{AppConfig, ConfigValueType};
pub use banner::Banner;
pub use changelog::Changelog;
pub use patch::Patch;
pub use status::ContentStatus;
pub use term::Term;
pub use version::Version;
