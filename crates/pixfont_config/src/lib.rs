mod errors;
pub mod settings;
pub mod storage;

pub use crate::errors::Error;
use crate::settings::{Setting, SettingInfo};
use crate::storage::MemoryStorageAdapter;
use lazy_static::lazy_static;
use log::warn;
use pixfont_shared::types::Result;
use serde_derive::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::mem;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use wildmatch::WildMatch;

/// Known settings with their defaults. Kept as json so it is easy to edit.
const SETTINGS_JSON: &str = include_str!("./settings.json");

/// `StorageAdapter` is the interface for storing and retrieving settings.
/// This can be used to store settings in memory, a json file, etc.
pub trait StorageAdapter: Send + Sync {
    /// Retrieves a setting from the storage
    fn get(&self, key: &str) -> Option<Setting>;

    /// Stores a given setting to the storage. Takes `&self`, adapters use interior mutability.
    fn set(&self, key: &str, value: Setting);

    /// Retrieves all the settings in the storage in one go. Used for preloading the
    /// `ConfigStore` when a storage is attached.
    fn all(&self) -> Result<HashMap<String, Setting>>;
}

lazy_static! {
    // The initial config store uses memory storage: settings live for the session only.
    static ref CONFIG_STORE: RwLock<ConfigStore> = RwLock::new(ConfigStore::default());
}

/// Returns the process wide config store. Any caller can just do
/// `config_store().get("display.width")`.
pub fn config_store() -> RwLockReadGuard<'static, ConfigStore> {
    CONFIG_STORE.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn config_store_write() -> RwLockWriteGuard<'static, ConfigStore> {
    CONFIG_STORE.write().unwrap_or_else(PoisonError::into_inner)
}

/// These macros simplify calls to the config store:
///
/// ```ignore
/// let width = config!(uint "display.width");
/// config_set!(uint "display.width", 96);
/// ```
///
/// An unknown key yields the type's empty value. Use `config_store().has("key")` to test for
/// existence.
#[allow(clippy::crate_in_macro_def)]
#[macro_export]
macro_rules! config {
    (string $key:expr) => {
        match $crate::config_store().get($key) {
            Some(setting) => setting.to_string(),
            None => String::new(),
        }
    };
    (bool $key:expr) => {
        match $crate::config_store().get($key) {
            Some(setting) => setting.to_bool(),
            None => false,
        }
    };
    (uint $key:expr) => {
        match $crate::config_store().get($key) {
            Some(setting) => setting.to_uint(),
            None => 0,
        }
    };
    (sint $key:expr) => {
        match $crate::config_store().get($key) {
            Some(setting) => setting.to_sint(),
            None => 0,
        }
    };
    (map $key:expr) => {
        match $crate::config_store().get($key) {
            Some(setting) => setting.to_map(),
            None => Vec::new(),
        }
    };
}

#[allow(clippy::crate_in_macro_def)]
#[macro_export]
macro_rules! config_set {
    (string $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::String($val))
    };
    (bool $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::Bool($val))
    };
    (uint $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::UInt($val))
    };
    (sint $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::SInt($val))
    };
    (map $key:expr, $val:expr) => {
        $crate::config_store().set($key, $crate::settings::Setting::Map($val))
    };
}

/// `JsonEntry` is used for parsing the settings.json file
#[derive(Debug, Deserialize)]
struct JsonEntry {
    key: String,
    #[serde(rename = "type")]
    _entry_type: String,
    default: String,
    description: String,
}

/// All configurable options of the pixfont tools
pub struct ConfigStore {
    /// Current values; the mutex lets `get`/`set` work through a shared reference
    settings: Mutex<HashMap<String, Setting>>,
    /// Descriptions, defaults and type information per key
    settings_info: HashMap<String, SettingInfo>,
    /// Keys of all settings in definition order
    setting_keys: Vec<String>,
    /// The storage adapter used for persisting and loading keys
    storage: Box<dyn StorageAdapter>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        let mut store = Self {
            settings: Mutex::new(HashMap::new()),
            settings_info: HashMap::new(),
            setting_keys: Vec::new(),
            storage: Box::new(MemoryStorageAdapter::new()),
        };

        // Populate the store with the default settings. They may be overwritten by the storage
        // as soon as one is attached with set_storage()
        if let Err(err) = store.populate_default_settings() {
            warn!("config: cannot load default settings: {err}");
        }
        store
    }
}

impl ConfigStore {
    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, Setting>> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a new storage engine and loads all settings found in it. Values already in the
    /// store are overwritten by the ones in the storage.
    pub fn set_storage(&mut self, storage: Box<dyn StorageAdapter>) {
        self.storage = storage;

        match self.storage.all() {
            Ok(all_settings) => {
                let mut values = self.values();
                for (key, value) in all_settings {
                    values.insert(key, value);
                }
            }
            Err(err) => warn!("config: cannot load settings from storage: {err}"),
        }
    }

    /// Returns true when the store knows about the given key
    pub fn has(&self, key: &str) -> bool {
        self.values().contains_key(key)
    }

    /// Returns a list of keys that matches the given search string (can use ? and *) for search
    /// wildcards.
    pub fn find(&self, search: &str) -> Vec<String> {
        let search = WildMatch::new(search);

        self.setting_keys
            .iter()
            .filter(|key| search.matches(key))
            .cloned()
            .collect()
    }

    /// Retrieves information about the given key, or returns None when key is unknown
    pub fn get_info(&self, key: &str) -> Option<SettingInfo> {
        self.settings_info.get(key).cloned()
    }

    /// Returns the setting with the given key. When the key is not loaded yet it is looked up in
    /// the storage, and otherwise the default is returned. Unknown keys return `None`.
    pub fn get(&self, key: &str) -> Option<Setting> {
        if let Some(setting) = self.values().get(key) {
            return Some(setting.clone());
        }

        // Setting not found, try and load it from the storage adapter
        if let Some(setting) = self.storage.get(key) {
            self.values().insert(key.to_string(), setting.clone());
            return Some(setting);
        }

        if let Some(info) = self.settings_info.get(key) {
            return Some(info.default.clone());
        }

        warn!("config: Setting {key} is not known");
        None
    }

    /// Sets the given setting to the given value and persists it to the storage. Settings
    /// without a settings-info entry, or with a value of another type than their default, are
    /// not stored.
    pub fn set(&self, key: &str, value: Setting) {
        let Some(info) = self.settings_info.get(key) else {
            warn!("config: Setting {key} is not known");
            return;
        };

        if mem::discriminant(&info.default) != mem::discriminant(&value) {
            warn!("config: Setting {key} is of different type than setting expects");
            return;
        }

        self.values().insert(key.to_owned(), value.clone());
        self.storage.set(key, value);
    }

    /// Populates the settings from the embedded settings.json file
    fn populate_default_settings(&mut self) -> Result<()> {
        let json_data: Value = serde_json::from_str(SETTINGS_JSON)?;

        let Value::Object(data) = json_data else {
            return Err(Error::Config("settings.json does not hold an object".into()).into());
        };

        for (section_prefix, section_entries) in data {
            let section_entries: Vec<JsonEntry> = serde_json::from_value(section_entries)?;

            for entry in section_entries {
                let key = format!("{}.{}", section_prefix, entry.key);

                let info = SettingInfo {
                    key: key.clone(),
                    description: entry.description,
                    default: Setting::from_str(&entry.default)?,
                };

                self.setting_keys.push(key.clone());
                self.values().insert(key.clone(), info.default.clone());
                self.settings_info.insert(key, info);
            }
        }

        Ok(())
    }
}
