//! Status lifecycle shared by every content table.
//!
//! Internal values are persisted; API values are what clients send and receive.

use serde::{Deserialize, Serialize};

/// Persisted status of a content row.
///
/// `Deleted` is terminal: no update statement touches a deleted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum ContentStatus {
    Normal,
    Deleted,
    Published,
}

/// API value for "not published".
pub const API_STATUS_UNPUBLISHED: i16 = 0;
/// API value for "published".
pub const API_STATUS_PUBLISHED: i16 = 1;

impl ContentStatus {
    pub const fn as_i16(self) -> i16 {
        match self {
            ContentStatus::Normal => 0,
            ContentStatus::Deleted => 1,
            ContentStatus::Published => 2,
        }
    }

    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(ContentStatus::Normal),
            1 => Some(ContentStatus::Deleted),
            2 => Some(ContentStatus::Published),
            _ => None,
        }
    }

    /// Maps a stored value, treating anything unknown as hidden.
    pub fn from_db(value: i16) -> Self {
        Self::from_i16(value).unwrap_or(ContentStatus::Deleted)
    }

    /// External representation: 1 when published, 0 otherwise.
    pub const fn api_status(self) -> i16 {
        match self {
            ContentStatus::Published => API_STATUS_PUBLISHED,
            _ => API_STATUS_UNPUBLISHED,
        }
    }

    /// Inverse of [`api_status`](Self::api_status). Clients cannot request deletion this way.
    pub const fn from_api_status(value: i16) -> Option<Self> {
        match value {
            API_STATUS_UNPUBLISHED => Some(ContentStatus::Normal),
            API_STATUS_PUBLISHED => Some(ContentStatus::Published),
            _ => None,
        }
    }

    pub const fn is_deleted(self) -> bool {
        matches!(self, ContentStatus::Deleted)
    }

    /// Whether a row in this status may move to `next`.
    pub const fn can_transition_to(self, next: ContentStatus) -> bool {
        !self.is_deleted()
            || matches!(next, ContentStatus::Deleted)
    }
}

impl From<ContentStatus> for i16 {
    fn from(status: ContentStatus) -> Self {
        status.as_i16()
    }
}

impl TryFrom<i16> for ContentStatus {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_i16(value).ok_or_else(|| format!("unknown status {}", value))
    }
}

/// Validator hook for optional inbound API status values.
pub fn validate_api_status(value: i16) -> Result<(), validator::ValidationError> {
    match ContentStatus::from_api_status(value) {
        Some(_) => Ok(()),
        None => {
            let mut err = validator::ValidationError::new("status");
            err.message = Some("Status must be 0 or 1".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_encoding() {
        assert_eq!(ContentStatus::Normal.as_i16(), 0);
        assert_eq!(ContentStatus::Deleted.as_i16(), 1);
        assert_eq!(ContentStatus::Published.as_i16(), 2);
        assert_eq!(ContentStatus::from_i16(2), Some(ContentStatus::Published));
        assert_eq!(ContentStatus::from_i16(7), None);
    }

    #[test]
    fn test_api_encoding() {
        assert_eq!(ContentStatus::Normal.api_status(), 0);
        assert_eq!(ContentStatus::Published.api_status(), 1);
        assert_eq!(ContentStatus::Deleted.api_status(), 0);
        assert_eq!(ContentStatus::from_api_status(1), Some(ContentStatus::Published));
        assert_eq!(ContentStatus::from_api_status(0), Some(ContentStatus::Normal));
        assert_eq!(ContentStatus::from_api_status(2), None);
    }

    #[test]
    fn test_unknown_stored_status_is_hidden() {
        assert_eq!(ContentStatus::from_db(42), ContentStatus::Deleted);
    }

    #[test]
    fn test_deleted_is_terminal() {
        assert!(ContentStatus::Normal.can_transition_to(ContentStatus::Published));
        assert!(ContentStatus::Published.can_transition_to(ContentStatus::Normal));
        assert!(!ContentStatus::Deleted.can_transition_to(ContentStatus::Published));
        assert!(!ContentStatus::Deleted.can_transition_to(ContentStatus::Normal));
        assert!(ContentStatus::Deleted.can_transition_to(ContentStatus::Deleted));
    }

    #[test]
    fn test_serde_uses_internal_value() {
        assert_eq!(serde_json::to_string(&ContentStatus::Published).unwrap(), "2");
        let status: ContentStatus = serde_json::from_str("1").unwrap();
        assert_eq!(status, ContentStatus::Deleted);
        assert!(serde_json::from_str::<ContentStatus>("9").is_err());
    }

    #[test]
    fn test_validate_api_status() {
        assert!(validate_api_status(0).is_ok());
        assert!(validate_api_status(1).is_ok());
        assert!(validate_api_status(2).is_err());
    }
}
