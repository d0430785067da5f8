//! Explicit "leave unchanged" versus "set" for partial updates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial update.
///
/// Deserializes from a missing field or `null` as [`Patch::Unchanged`] (pair it with
/// `#[serde(default)]`), and from any other value as [`Patch::Set`]. Setting an empty
/// string is therefore distinct from not touching the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Set(value) => Patch::Set(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }

    /// Like `map`, but a `None` result downgrades to `Unchanged`.
    pub fn filter_map<U>(self, f: impl FnOnce(T) -> Option<U>) -> Patch<U> {
        match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Set(value) => f(value).map_or(Patch::Unchanged, Patch::Set),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Unchanged => None,
            Patch::Set(value) => Some(value),
        }
    }
}

impl<T: AsRef<str>> Patch<T> {
    /// Borrowed view suitable for binding as a nullable SQL parameter.
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Patch::Unchanged => None,
            Patch::Set(value) => Some(value.as_ref()),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Unchanged, Patch::Set)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

// `validator` attaches the rejected value to its errors, so fields must serialize.
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Unchanged => serializer.serialize_none(),
            Patch::Set(value) => serializer.serialize_some(value),
        }
    }
}

/// Validator hook: a set value must not be blank.
pub fn validate_patch_not_blank(value: &Patch<String>) -> Result<(), validator::ValidationError> {
    match value {
        Patch::Set(s) => shared::validation::validate_not_blank(s),
        Patch::Unchanged => Ok(()),
    }
}

/// Validator hook: a set platform must be a valid platform tag.
pub fn validate_patch_platform(value: &Patch<String>) -> Result<(), validator::ValidationError> {
    match value {
        Patch::Set(s) => shared::validation::validate_platform(s),
        Patch::Unchanged => Ok(()),
    }
}

/// Validator hook: a set status must be an API status value.
pub fn validate_patch_api_status(value: &Patch<i16>) -> Result<(), validator::ValidationError> {
    match value {
        Patch::Set(s) => crate::models::status::validate_api_status(*s),
        Patch::Unchanged => Ok(()),
    }
}
