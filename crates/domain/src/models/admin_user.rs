//! Admin accounts for the management console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidationError;

use super::patch::Patch;
use super::status::ContentStatus;
use shared::datetime::format_datetime;

/// Permission group of an admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum AdminGroup {
    /// May manage other admin accounts.
    SuperAdmin,
    NormalAdmin,
}

impl AdminGroup {
    pub const fn as_i16(self) -> i16 {
        match self {
            AdminGroup::SuperAdmin => 1,
            AdminGroup::NormalAdmin => 2,
        }
    }

    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(AdminGroup::SuperAdmin),
            2 => Some(AdminGroup::NormalAdmin),
            _ => None,
        }
    }

    pub const fn is_super(self) -> bool {
        matches!(self, AdminGroup::SuperAdmin)
    }
}

impl From<AdminGroup> for i16 {
    fn from(group: AdminGroup) -> Self {
        group.as_i16()
    }
}

impl TryFrom<i16> for AdminGroup {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_i16(value).ok_or_else(|| format!("unknown admin group {}", value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string. Never serialized.
    pub password_hash: String,
    pub group: AdminGroup,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub group: AdminGroup,
}

#[derive(Debug, Clone, Default)]
pub struct AdminUserChanges {
    pub username: Patch<String>,
    pub password_hash: Patch<String>,
    pub group: Patch<AdminGroup>,
}

/// Credentials checked by the handlers; missing and blank fields get their own error codes.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddAdminRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAdminRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModifyAdminRequest {
    pub id: i64,
    #[serde(default)]
    pub username: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
    #[serde(default)]
    pub groupid: Patch<i16>,
}

impl ModifyAdminRequest {
    /// Rejects blank credentials and unknown groups before anything is hashed.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        if let Patch::Set(username) = &self.username {
            shared::validation::validate_not_blank(username)?;
        }
        if let Patch::Set(password) = &self.password {
            shared::validation::validate_not_blank(password)?;
        }
        if let Patch::Set(group) = self.groupid {
            if AdminGroup::from_i16(group).is_none() {
                let mut err = ValidationError::new("group");
                err.message = Some("Unknown admin group".into());
                return Err(err);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub token: String,
    pub groupid: i16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    pub id: i64,
    pub username: String,
    pub add_time: String,
    pub groupid: i16,
    pub update_time: String,
}

impl From<AdminUser> for AdminUserItem {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            add_time: format_datetime(user.create_time),
            groupid: user.group.as_i16(),
            update_time: format_datetime(user.update_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_values() {
        assert_eq!(AdminGroup::SuperAdmin.as_i16(), 1);
        assert_eq!(AdminGroup::from_i16(2), Some(AdminGroup::NormalAdmin));
        assert_eq!(AdminGroup::from_i16(0), None);
        assert!(AdminGroup::SuperAdmin.is_super());
        assert!(!AdminGroup::NormalAdmin.is_super());
    }

    #[test]
    fn test_item_hides_password() {
        let user = AdminUser {
            id: 1,
            username: "root".into(),
            password_hash: "$argon2id$secret".into(),
            group: AdminGroup::SuperAdmin,
            status: ContentStatus::Normal,
            create_time: Utc::now(),
            update_time: Utc::now(),
        };
        let json = serde_json::to_value(AdminUserItem::from(user)).unwrap();
        assert_eq!(json["groupid"], 1);
        assert!(json.get("addTime").is_some());
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_modify_validation() {
        let ok: ModifyAdminRequest = serde_json::from_str(r#"{"id": 3, "groupid": 2}"#).unwrap();
        assert!(ok.validate_fields().is_ok());

        let bad_group: ModifyAdminRequest =
            serde_json::from_str(r#"{"id": 3, "groupid": 5}"#).unwrap();
        assert!(bad_group.validate_fields().is_err());

        let blank: ModifyAdminRequest =
            serde_json::from_str(r#"{"id": 3, "password": " "}"#).unwrap();
        assert!(blank.validate_fields().is_err());
    }

    #[test]
    fn test_login_request_defaults() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.username.is_empty());
        assert!(req.password.is_empty());
    }
}
