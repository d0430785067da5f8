//! Pure domain services.

pub mod public_config;
pub mod urls;

pub use public_config::{
    build_public_config, ConfigLayout, PublicConfigInput, ReleaseInfo, TermDateStyle,
};
pub use urls::MediaUrls;
