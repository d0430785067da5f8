//! Custom Axum extractors.

pub mod admin;
pub mod platform;
pub mod request;

pub use platform::{PlatformHeader, RequiredPlatform, PLATFORM_HEADER};
pub use request::{AppForm, AppJson, AppQuery};
