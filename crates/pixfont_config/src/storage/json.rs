use crate::settings::Setting;
use crate::StorageAdapter;
use anyhow::bail;
use log::warn;
use pixfont_shared::types::Result;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Stores settings in a flat json object (`{"display.width": "u:128", ...}`). Every change
/// is written back to the file.
pub struct JsonStorageAdapter {
    path: PathBuf,
    elements: Mutex<HashMap<String, Setting>>,
}

impl TryFrom<&Path> for JsonStorageAdapter {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> Result<Self> {
        if let Ok(metadata) = fs::metadata(path) {
            if !metadata.is_file() {
                bail!("json settings path {} is not a regular file", path.display());
            }
        } else {
            fs::write(path, "{}")?;
        }

        let adapter = JsonStorageAdapter {
            path: path.to_path_buf(),
            elements: Mutex::new(Self::read_file(path)?),
        };

        Ok(adapter)
    }
}

impl TryFrom<&String> for JsonStorageAdapter {
    type Error = anyhow::Error;

    fn try_from(path: &String) -> Result<Self> {
        Self::try_from(Path::new(path))
    }
}

impl StorageAdapter for JsonStorageAdapter {
    fn get(&self, key: &str) -> Option<Setting> {
        let lock = self.elements.lock().unwrap_or_else(PoisonError::into_inner);
        lock.get(key).cloned()
    }

    fn set(&self, key: &str, value: Setting) {
        let mut lock = self.elements.lock().unwrap_or_else(PoisonError::into_inner);
        lock.insert(key.to_owned(), value);

        if let Err(err) = self.write_file(&lock) {
            warn!("config: cannot write settings to {}: {err}", self.path.display());
        }
    }

    fn all(&self) -> Result<HashMap<String, Setting>> {
        let lock = self.elements.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(lock.clone())
    }
}

impl JsonStorageAdapter {
    /// Reads the whole json file. Entries that are not valid settings are skipped.
    fn read_file(path: &Path) -> Result<HashMap<String, Setting>> {
        let buf = fs::read_to_string(path)?;
        let parsed_json: Value = serde_json::from_str(&buf)?;

        let mut elements = HashMap::new();
        let Value::Object(settings) = parsed_json else {
            bail!("json settings file {} does not hold an object", path.display());
        };

        for (key, value) in settings {
            match serde_json::from_value::<Setting>(value) {
                Ok(setting) => {
                    elements.insert(key, setting);
                }
                Err(err) => {
                    warn!("problem reading setting {key} from json: {err}");
                }
            }
        }

        Ok(elements)
    }

    /// Writes all elements back, sorted by key so the file diffs nicely
    fn write_file(&self, elements: &HashMap<String, Setting>) -> Result<()> {
        let sorted: BTreeMap<&String, &Setting> = elements.iter().collect();
        let json = serde_json::to_string_pretty(&sorted)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
