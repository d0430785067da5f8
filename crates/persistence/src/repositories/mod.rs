//! Repository implementations for database operations.

pub mod admin_user;
pub mod announcement;
pub mod app_config;
pub mod banner;
pub mod changelog;
pub mod lifecycle;
pub mod term;
pub mod version;

pub use admin_user::AdminUserRepository;
pub use announcement::AnnouncementRepository;
pub use app_config::AppConfigRepository;
pub use banner::BannerRepository;
pub use changelog::ChangelogRepository;
pub use lifecycle::ContentTable;
pub use term::TermRepository;
pub use version::VersionRepository;
