//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod admin_user;
pub mod announcement;
pub mod app_config;
pub mod banner;
pub mod changelog;
pub mod term;
pub mod version;

pub use admin_user::AdminUserEntity;
pub use announcement::AnnouncementEntity;
pub use app_config::AppConfigEntity;
pub use banner::BannerEntity;
pub use changelog::ChangelogEntity;
pub use term::TermEntity;
pub use version::VersionEntity;
