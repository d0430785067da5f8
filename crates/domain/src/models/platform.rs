//! Client platforms.

pub const ANDROID: &str = "android";
pub const IOS: &str = "ios";
/// WeChat mini-program.
pub const MINI_PROGRAM: &str = "mp";

pub const KNOWN_PLATFORMS: [&str; 3] = [ANDROID, IOS, MINI_PROGRAM];

/// Platforms targeted when a request does not name any.
pub fn default_platforms() -> Vec<String> {
    KNOWN_PLATFORMS.iter().map(|p| p.to_string()).collect()
}
