use crate::errors::Error;
use core::fmt::Display;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A setting can be either a signed integer, unsigned integer, string, map or boolean.
/// Maps are stored as comma separated strings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Setting {
    SInt(isize),
    UInt(usize),
    String(String),
    Bool(bool),
    Map(Vec<String>),
}

impl Setting {
    #[must_use]
    pub fn to_bool(&self) -> bool {
        if !matches!(self, Self::Bool(_)) {
            warn!("setting is not a boolean");
        }

        match self {
            Self::Bool(value) => *value,
            Self::SInt(value) => *value != 0,
            Self::UInt(value) => *value != 0,
            Self::String(value) => is_bool_value(value),
            Self::Map(values) => !values.is_empty(),
        }
    }

    #[must_use]
    pub fn to_sint(&self) -> isize {
        if !matches!(self, Self::SInt(_)) {
            warn!("setting is not an signed integer");
        }

        match self {
            Self::SInt(value) => *value,
            Self::UInt(value) => isize::try_from(*value).unwrap_or(isize::MAX),
            Self::Bool(value) => isize::from(*value),
            Self::String(value) => isize::from(is_bool_value(value)),
            Self::Map(values) => isize::try_from(values.len()).unwrap_or(isize::MAX),
        }
    }

    #[must_use]
    pub fn to_uint(&self) -> usize {
        if !matches!(self, Self::UInt(_)) {
            warn!("setting is not an unsigned integer");
        }

        match self {
            Self::UInt(value) => *value,
            Self::SInt(value) => usize::try_from(*value).unwrap_or(0),
            Self::Bool(value) => usize::from(*value),
            Self::String(value) => usize::from(is_bool_value(value)),
            Self::Map(values) => values.len(),
        }
    }

    #[allow(clippy::inherent_to_string_shadow_display)]
    #[must_use]
    pub fn to_string(&self) -> String {
        if !matches!(self, Self::String(_)) {
            warn!("setting is not a string");
        }

        self.raw_value()
    }

    #[must_use]
    pub fn to_map(&self) -> Vec<String> {
        if !matches!(self, Self::Map(_)) {
            warn!("setting is not a map");
        }

        match self {
            Self::Map(values) => values.clone(),
            other => vec![other.raw_value()],
        }
    }

    /// The value without type prefix and without any type warnings
    fn raw_value(&self) -> String {
        match self {
            Self::SInt(value) => value.to_string(),
            Self::UInt(value) => value.to_string(),
            Self::String(value) => value.clone(),
            Self::Bool(value) => value.to_string(),
            Self::Map(values) => values.join(","),
        }
    }

    /// Type prefix as used in the string notation
    fn prefix(&self) -> &'static str {
        match self {
            Self::SInt(_) => "i",
            Self::UInt(_) => "u",
            Self::String(_) => "s",
            Self::Bool(_) => "b",
            Self::Map(_) => "m",
        }
    }
}

fn is_bool_value(s: &str) -> bool {
    let us = s.to_uppercase();
    ["YES", "ON", "TRUE", "1"].contains(&us.as_str())
}

impl Serialize for Setting {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("{}:{}", self.prefix(), self.raw_value()))
    }
}

impl<'de> Deserialize<'de> for Setting {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value)
            .map_err(|err| serde::de::Error::custom(format!("cannot deserialize: {err}")))
    }
}

impl Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Map(_) => write!(f, "m: {}", self.raw_value()),
            other => write!(f, "{}:{}", other.prefix(), other.raw_value()),
        }
    }
}

impl FromStr for Setting {
    type Err = Error;

    // first element is the type:
    //   b:true
    //   i:-123
    //   u:234
    //   s:hello world
    //   m:foo,bar,baz

    /// Converts a string to a setting, or an error when the string is invalid
    fn from_str(key: &str) -> Result<Self, crate::errors::Error> {
        let Some((key_type, key_value)) = key.split_once(':') else {
            return Err(Error::Config(format!("setting without type prefix: {key}")));
        };

        let setting = match key_type {
            "b" => Self::Bool(
                key_value
                    .parse::<bool>()
                    .map_err(|err| Error::Config(format!("error parsing {key_value}: {err}")))?,
            ),
            "i" => Self::SInt(
                key_value
                    .parse::<isize>()
                    .map_err(|err| Error::Config(format!("error parsing {key_value}: {err}")))?,
            ),
            "u" => Self::UInt(
                key_value
                    .parse::<usize>()
                    .map_err(|err| Error::Config(format!("error parsing {key_value}: {err}")))?,
            ),
            "s" => Self::String(key_value.to_string()),
            "m" => Self::Map(key_value.split(',').map(str::to_string).collect()),
            _ => return Err(Error::Config(format!("unknown setting type: {key_type}"))),
        };

        Ok(setting)
    }
}

/// `SettingInfo` returns information about a given setting
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SettingInfo {
    /// Name of the key (dot notation, ie: display.width)
    pub key: String,
    /// Description of the setting
    pub description: String,
    /// Default setting if none has been specified
    pub default: Setting,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn setting() {
        let s = Setting::from_str("b:true").unwrap();
        assert_eq!(s, Setting::Bool(true));
        assert!(s.to_bool());
        assert_eq!(1, s.to_sint());
        assert_eq!(1, s.to_uint());
        assert_eq!("true", s.to_string());
        assert_eq!(vec!["true"], s.to_map());

        let s = Setting::from_str("i:-1").unwrap();
        assert_eq!(s, Setting::SInt(-1));
        assert!(s.to_bool());
        assert_eq!(-1, s.to_sint());
        assert_eq!(0, s.to_uint());
        assert_eq!("-1", s.to_string());

        let s = Setting::from_str("u:128").unwrap();
        assert_eq!(s, Setting::UInt(128));
        assert_eq!(128, s.to_uint());
        assert_eq!(128, s.to_sint());

        let s = Setting::from_str("s:Hello: World").unwrap();
        assert_eq!(s, Setting::String("Hello: World".into()));
        assert!(!s.to_bool());
        assert_eq!("Hello: World", s.to_string());

        let s = Setting::from_str("m:foo,bar,baz").unwrap();
        assert_eq!(
            s,
            Setting::Map(vec!["foo".into(), "bar".into(), "baz".into()])
        );
        assert_eq!(3, s.to_uint());
        assert_eq!("foo,bar,baz", s.to_string());
        assert_eq!(vec!["foo", "bar", "baz"], s.to_map());

        let s = Setting::from_str("s:on").unwrap();
        assert!(s.to_bool());
        let s = Setting::from_str("s:off").unwrap();
        assert!(!s.to_bool());
    }

    #[test]
    fn invalid_settings() {
        assert!(matches!(Setting::from_str("notexist:true"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("b:foobar"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("u:-1"), Err(Error::Config(_))));
        assert!(matches!(Setting::from_str("no prefix"), Err(Error::Config(_))));
    }

    #[test]
    fn serde_round_trip() {
        let settings = vec![
            Setting::UInt(64),
            Setting::SInt(-3),
            Setting::Bool(false),
            Setting::String("two\nlines".into()),
            Setting::Map(vec!["a".into(), "b".into()]),
        ];
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"["u:64","i:-3","b:false","s:two\nlines","m:a,b"]"#);
        let back: Vec<Setting> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
