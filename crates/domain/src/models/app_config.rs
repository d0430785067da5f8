//! Feature-flag style configuration entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::patch::{validate_patch_not_blank, Patch};
use super::status::ContentStatus;
use shared::datetime::format_datetime;
use shared::validation::{validate_not_blank, validate_platform_list};

/// How the admin UI edits a config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum ConfigValueType {
    /// Free text input.
    String,
    /// One of `possible_values`.
    Select,
    /// Switch; value is `"true"` or `"false"`.
    Bool,
}

impl ConfigValueType {
    pub const fn as_i16(self) -> i16 {
        match self {
            ConfigValueType::String => 0,
            ConfigValueType::Select => 1,
            ConfigValueType::Bool => 2,
        }
    }

    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(ConfigValueType::String),
            1 => Some(ConfigValueType::Select),
            2 => Some(ConfigValueType::Bool),
            _ => None,
        }
    }

    pub const fn is_bool(self) -> bool {
        matches!(self, ConfigValueType::Bool)
    }
}

impl From<ConfigValueType> for i16 {
    fn from(value: ConfigValueType) -> Self {
        value.as_i16()
    }
}

impl TryFrom<i16> for ConfigValueType {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_i16(value).ok_or_else(|| format!("unknown config type {}", value))
    }
}

/// Options every bool config carries.
pub fn bool_options() -> Vec<String> {
    vec!["true".to_string(), "false".to_string()]
}

/// Stored bool values are the strings `"true"`/`"false"`; anything else reads as false.
pub fn parse_bool_value(value: &str) -> bool {
    value == "true"
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub possible_values: Vec<String>,
    /// `None` for rows whose stored type is not recognised; they render as plain strings.
    pub value_type: Option<ConfigValueType>,
    pub describe: String,
    pub platform: String,
    pub status: ContentStatus,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl AppConfig {
    pub fn is_bool(&self) -> bool {
        self.value_type.is_some_and(ConfigValueType::is_bool)
    }
}

#[derive(Debug, Clone)]
pub struct NewAppConfig {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub possible_values: Vec<String>,
    pub value_type: ConfigValueType,
    pub describe: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigChanges {
    pub name: Patch<String>,
    pub value: Patch<String>,
    pub describe: Patch<String>,
    pub possible_values: Patch<Vec<String>>,
}

fn validate_config_type(value: i16) -> Result<(), ValidationError> {
    match ConfigValueType::from_i16(value) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("config_type");
            err.message = Some("Config type must be 0, 1 or 2".into());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_add_config"))]
pub struct AddConfigRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub setting_name: String,
    pub current_setting: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_config_type"))]
    pub value_type: i16,
    #[serde(default)]
    pub content: String,
    #[validate(custom(function = "validate_platform_list"))]
    pub platform: Vec<String>,
    #[serde(default)]
    pub option_list: Vec<String>,
}

fn validate_add_config(req: &AddConfigRequest) -> Result<(), ValidationError> {
    if ConfigValueType::from_i16(req.value_type).is_some_and(ConfigValueType::is_bool)
        && req.current_setting != "true"
        && req.current_setting != "false"
    {
        let mut err = ValidationError::new("bool_value");
        err.message = Some("Bool configs take \"true\" or \"false\"".into());
        return Err(err);
    }
    Ok(())
}

impl AddConfigRequest {
    /// Option list to store; bool configs always get `["true", "false"]`.
    pub fn possible_values(&self) -> Vec<String> {
        match ConfigValueType::from_i16(self.value_type) {
            Some(ConfigValueType::Bool) => bool_options(),
            _ => self.option_list.clone(),
        }
    }

    pub fn value_type(&self) -> ConfigValueType {
        ConfigValueType::from_i16(self.value_type).unwrap_or(ConfigValueType::String)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModifyConfigRequest {
    pub config_id: i64,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_not_blank"))]
    pub config_name: Patch<String>,
    #[serde(default)]
    pub current_setting: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub option_list: Patch<Vec<String>>,
}

impl ModifyConfigRequest {
    pub fn into_changes(self) -> (i64, AppConfigChanges) {
        (
            self.config_id,
            AppConfigChanges {
                name: self.config_name,
                value: self.current_setting,
                describe: self.content,
                possible_values: self.option_list,
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConfigQuery {
    pub config_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigListQuery {
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOption {
    pub option_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub id: i64,
    pub setting_name: String,
    pub current_setting: String,
    #[serde(rename = "type")]
    pub value_type: i16,
    pub content: String,
    pub platform: String,
    pub update_time: String,
    pub options_list: Vec<ConfigOption>,
}

impl From<AppConfig> for ConfigItem {
    fn from(config: AppConfig) -> Self {
        Self {
            id: config.id,
            setting_name: config.name,
            current_setting: config.value,
            value_type: config.value_type.map_or(-1, ConfigValueType::as_i16),
            content: config.describe,
            platform: config.platform,
            update_time: format_datetime(config.update_time),
            options_list: config
                .possible_values
                .into_iter()
                .map(|option_name| ConfigOption { option_name })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigListResponse {
    pub configs: Vec<ConfigItem>,
    pub num: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformListResponse {
    pub platform: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_request(json: &str) -> AddConfigRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bool_config_forces_options() {
        let req = add_request(
            r#"{"settingName":"darkMode","currentSetting":"true","type":2,"platform":["mp"],"optionList":["a"]}"#,
        );
        assert!(req.validate().is_ok());
        assert_eq!(req.possible_values(), bool_options());
        assert_eq!(req.value_type(), ConfigValueType::Bool);
    }

    #[test]
    fn test_bool_config_rejects_other_values() {
        let req = add_request(
            r#"{"settingName":"darkMode","currentSetting":"yes","type":2,"platform":["mp"]}"#,
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_select_config_keeps_options() {
        let req = add_request(
            r#"{"settingName":"theme","currentSetting":"blue","type":1,"platform":["ios"],"optionList":["blue","red"]}"#,
        );
        assert!(req.validate().is_ok());
        assert_eq!(req.possible_values(), vec!["blue", "red"]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let req = add_request(
            r#"{"settingName":"x","currentSetting":"1","type":7,"platform":["ios"]}"#,
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_item_shape() {
        let config = AppConfig {
            id: 9,
            name: "news".into(),
            value: "on".into(),
            possible_values: vec!["on".into(), "off".into()],
            value_type: Some(ConfigValueType::Select),
            describe: "news tab".into(),
            platform: "mp".into(),
            status: ContentStatus::Normal,
            create_time: Utc::now(),
            update_time: Utc::now(),
        };
        let json = serde_json::to_value(ConfigItem::from(config)).unwrap();
        assert_eq!(json["settingName"], "news");
        assert_eq!(json["currentSetting"], "on");
        assert_eq!(json["type"], 1);
        assert_eq!(json["optionsList"][1]["optionName"], "off");
    }

    #[test]
    fn test_parse_bool_value() {
        assert!(parse_bool_value("true"));
        assert!(!parse_bool_value("TRUE"));
        assert!(!parse_bool_value(""));
    }

    #[test]
    fn test_modify_request_patch() {
        let req: ModifyConfigRequest =
            serde_json::from_str(r#"{"configId":4,"currentSetting":"false"}"#).unwrap();
        let (id, changes) = req.into_changes();
        assert_eq!(id, 4);
        assert_eq!(changes.value, Patch::Set("false".to_string()));
        assert_eq!(changes.possible_values, Patch::Unchanged);
    }
}
