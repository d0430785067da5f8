//! Request validation helpers used by the domain request types.

use validator::ValidationError;

/// Longest accepted platform tag.
pub const MAX_PLATFORM_LEN: usize = 32;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects empty or whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

/// A single platform tag: non-blank, short, no whitespace inside.
pub fn validate_platform(platform: &str) -> Result<(), ValidationError> {
    if platform.trim().is_empty() {
        return Err(error("platform_blank", "Platform must not be blank"));
    }
    if platform.len() > MAX_PLATFORM_LEN {
        return Err(error("platform_length", "Platform tag is too long"));
    }
    if platform.chars().any(char::is_whitespace) {
        return Err(error("platform_format", "Platform must not contain whitespace"));
    }
    Ok(())
}

/// A fan-out target list: at least one entry and every entry a valid platform.
pub fn validate_platform_list(platforms: &[String]) -> Result<(), ValidationError> {
    if platforms.is_empty() {
        return Err(error("platform_required", "At least one platform is required"));
    }
    platforms.iter().try_for_each(|p| validate_platform(p))
}

/// Drops duplicates while keeping the first-seen order.
pub fn dedup_platforms(platforms: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let platform = platform.trim();
        if !unique.iter().any(|p| p == platform) {
            unique.push(platform.to_string());
        }
    }
    unique
}

/// Ids referenced by batch operations must be positive snowflake ids.
pub fn validate_id_list(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        return Err(error("ids_required", "At least one id is required"));
    }
    if ids.iter().any(|id| *id <= 0) {
        return Err(error("id_invalid", "Ids must be positive"));
    }
    Ok(())
}
