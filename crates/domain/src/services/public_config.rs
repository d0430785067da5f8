//! Legacy public config payload.
//!
//! The app clients read one flat-ish JSON map combining feature flags, the latest
//! release and the term list. Its layout differs between the mini program and the
//! native apps, and both must stay stable.

use serde_json::{Map, Value};

use crate::models::app_config::{parse_bool_value, AppConfig};
use crate::models::platform::{ANDROID, MINI_PROGRAM};
use crate::models::term::{Term, TermItem};
use shared::datetime::{date_to_epoch_millis, format_naive_date};

/// Non-bool config nested under `menuList` for the mini program.
pub const MENU_LIST_KEY: &str = "volunteer";
/// Non-bool config nested under `schedule` for the mini program.
pub const SCHEDULE_KEY: &str = "scheduleVersion";
/// Non-bool configs the mini program payload has never carried. Released clients
/// read the payload as is, so these stay out.
pub const MINI_PROGRAM_OMITTED: [&str; 2] = ["news", "refreshSchedule"];

/// Payload layout, decided by the requesting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayout {
    /// Native bools, `menuList`/`schedule` nesting, terms under `termList`.
    MiniProgram,
    /// Bools as 1/0, flat names, terms under `termSetting`.
    Native,
}

impl ConfigLayout {
    pub fn for_platform(platform: &str) -> Self {
        if platform == MINI_PROGRAM {
            ConfigLayout::MiniProgram
        } else {
            ConfigLayout::Native
        }
    }
}

/// How term start dates are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermDateStyle {
    /// `YYYY-MM-DD`.
    Date,
    /// Local midnight as Unix milliseconds, rendered as a string.
    EpochMillis,
}

impl TermDateStyle {
    pub fn for_platform(platform: &str) -> Self {
        if platform == ANDROID {
            TermDateStyle::EpochMillis
        } else {
            TermDateStyle::Date
        }
    }

    fn render(self, term: &Term) -> String {
        match self {
            TermDateStyle::Date => format_naive_date(term.start_date),
            TermDateStyle::EpochMillis => date_to_epoch_millis(term.start_date).to_string(),
        }
    }
}

/// Latest published release to merge into the payload.
#[derive(Debug, Clone)]
pub struct ReleaseInfo {
    pub version: String,
    pub update_content: String,
    pub apk_url: String,
}

/// Everything the payload is built from.
#[derive(Debug, Clone)]
pub struct PublicConfigInput<'a> {
    pub layout: ConfigLayout,
    pub term_dates: TermDateStyle,
    pub configs: &'a [AppConfig],
    pub release: Option<ReleaseInfo>,
    pub terms: &'a [Term],
}

/// Builds the public config map.
pub fn build_public_config(input: PublicConfigInput<'_>) -> Map<String, Value> {
    let mut resp = match input.layout {
        ConfigLayout::MiniProgram => mini_program_configs(input.configs),
        ConfigLayout::Native => native_configs(input.configs),
    };

    if let Some(release) = input.release {
        resp.insert("updateContent".into(), Value::String(release.update_content));
        resp.insert("version".into(), Value::String(release.version));
        resp.insert("apkUrl".into(), Value::String(release.apk_url));
    }

    let terms: Vec<Value> = input
        .terms
        .iter()
        .map(|term| {
            let item = TermItem::new(term, input.term_dates.render(term));
            serde_json::to_value(item).unwrap_or(Value::Null)
        })
        .collect();
    let term_key = match input.layout {
        ConfigLayout::MiniProgram => "termList",
        ConfigLayout::Native => "termSetting",
    };
    resp.insert(term_key.into(), Value::Array(terms));

    resp
}

fn mini_program_configs(configs: &[AppConfig]) -> Map<String, Value> {
    let mut resp = Map::new();
    let mut menu_list = Map::new();
    let mut schedule = Map::new();

    for config in configs {
        let value = Value::String(config.value.clone());
        if config.is_bool() {
            resp.insert(config.name.clone(), Value::Bool(parse_bool_value(&config.value)));
        } else if MINI_PROGRAM_OMITTED.contains(&config.name.as_str()) {
            continue;
        } else if config.name == MENU_LIST_KEY {
            menu_list.insert(config.name.clone(), value);
        } else if config.name == SCHEDULE_KEY {
            schedule.insert(config.name.clone(), value);
        } else {
            resp.insert(config.name.clone(), value);
        }
    }

    resp.insert("menuList".into(), Value::Object(menu_list));
    resp.insert("schedule".into(), Value::Object(schedule));
    resp
}

fn native_configs(configs: &[AppConfig]) -> Map<String, Value> {
    configs
        .iter()
        .map(|config| {
            let value = if config.is_bool() {
                Value::from(i32::from(parse_bool_value(&config.value)))
            } else {
                Value::String(config.value.clone())
            };
            (config.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::app_config::ConfigValueType;
    use crate::models::status::ContentStatus;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    fn config(name: &str, value: &str, value_type: ConfigValueType, platform: &str) -> AppConfig {
        AppConfig {
            id: 1,
            name: name.into(),
            value: value.into(),
            possible_values: vec![],
            value_type: Some(value_type),
            describe: String::new(),
            platform: platform.into(),
            status: ContentStatus::Normal,
            create_time: Utc::now(),
            update_time: Utc::now(),
        }
    }

    fn term() -> Term {
        Term {
            id: 11,
            term: "2024-2025-1".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            status: ContentStatus::Normal,
            create_time: Utc::now(),
            update_time: Utc::now(),
        }
    }

    fn build(platform: &str, configs: &[AppConfig], terms: &[Term]) -> Value {
        Value::Object(build_public_config(PublicConfigInput {
            layout: ConfigLayout::for_platform(platform),
            term_dates: TermDateStyle::for_platform(platform),
            configs,
            release: None,
            terms,
        }))
    }

    #[test]
    fn test_mini_program_bool_is_native_and_top_level() {
        let configs = [config("darkMode", "true", ConfigValueType::Bool, "mp")];
        let resp = build("mp", &configs, &[]);
        assert_eq!(resp["darkMode"], json!(true));
        assert_eq!(resp["menuList"], json!({}));
        assert_eq!(resp["schedule"], json!({}));
    }

    #[test]
    fn test_android_bool_is_integer() {
        let configs = [
            config("darkMode", "true", ConfigValueType::Bool, "android"),
            config("beta", "nope", ConfigValueType::Bool, "android"),
        ];
        let resp = build("android", &configs, &[]);
        assert_eq!(resp["darkMode"], json!(1));
        assert_eq!(resp["beta"], json!(0));
        assert!(resp.get("menuList").is_none());
    }

    #[test]
    fn test_mini_program_nesting() {
        let configs = [
            config("news", "on", ConfigValueType::String, "mp"),
            config("volunteer", "off", ConfigValueType::Select, "mp"),
            config("refreshSchedule", "1", ConfigValueType::String, "mp"),
            config("scheduleVersion", "3", ConfigValueType::String, "mp"),
            config("notice", "hello", ConfigValueType::String, "mp"),
        ];
        let resp = build("mp", &configs, &[]);
        assert_eq!(resp["menuList"], json!({"volunteer": "off"}));
        assert_eq!(resp["schedule"], json!({"scheduleVersion": "3"}));
        assert_eq!(resp["notice"], "hello");
        assert!(resp.get("news").is_none());
        assert!(resp.get("refreshSchedule").is_none());
    }

    #[test]
    fn test_mini_program_keeps_omitted_names_when_bool() {
        let configs = [config("news", "true", ConfigValueType::Bool, "mp")];
        let resp = build("mp", &configs, &[]);
        assert_eq!(resp["news"], json!(true));
        assert_eq!(resp["menuList"], json!({}));
    }

    #[test]
    fn test_nested_names_stay_flat_on_native() {
        let configs = [config("news", "on", ConfigValueType::String, "ios")];
        let resp = build("ios", &configs, &[]);
        assert_eq!(resp["news"], "on");
    }

    #[test]
    fn test_release_fields_merged() {
        let resp = build_public_config(PublicConfigInput {
            layout: ConfigLayout::Native,
            term_dates: TermDateStyle::Date,
            configs: &[],
            release: Some(ReleaseInfo {
                version: "2.0.0".into(),
                update_content: "new ui".into(),
                apk_url: "https://cdn/app.apk".into(),
            }),
            terms: &[],
        });
        assert_eq!(resp["version"], "2.0.0");
        assert_eq!(resp["updateContent"], "new ui");
        assert_eq!(resp["apkUrl"], "https://cdn/app.apk");
    }

    #[test]
    fn test_term_keys_and_date_styles() {
        let terms = [term()];

        let mp = build("mp", &[], &terms);
        assert_eq!(mp["termList"][0]["startDate"], "2024-09-02");
        assert!(mp.get("termSetting").is_none());

        let ios = build("ios", &[], &terms);
        assert_eq!(ios["termSetting"][0]["startDate"], "2024-09-02");
        assert_eq!(ios["termSetting"][0]["id"], 11);

        let android = build("android", &[], &terms);
        let millis = date_to_epoch_millis(terms[0].start_date).to_string();
        assert_eq!(android["termSetting"][0]["startDate"], Value::String(millis));
    }
}
