//! Overridable tool descriptions and titles.
//!
//! Every user-facing string is looked up by key with a built-in default.
//! Overrides come from a JSON file (`{"KEY": "text"}`) and from `TOOLSETS_<KEY>`
//! environment variables, the latter winning. Each key that is looked up is
//! remembered so the full set can be exported as a starting override file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::types::{Error, Result, ENV_PREFIX};

#[derive(Debug, Default)]
pub struct Translator {
    overrides: HashMap<String, String>,
    used: Mutex<BTreeMap<String, String>>,
}

impl Translator {
    /// Translator that always returns the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v))
                .collect(),
            used: Mutex::default(),
        }
    }

    /// Load overrides from an optional JSON file, then from the environment.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut overrides: HashMap<String, String> = HashMap::new();

        if let Some(path) = path.filter(|p| p.exists()) {
            let content = std::fs::read_to_string(path)?;
            let from_file: HashMap<String, String> =
                serde_json::from_str(&content).map_err(|e| {
                    Error::configuration(format!(
                        "invalid translations file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            overrides.extend(from_file);
        }

        overrides.extend(std::env::vars().filter_map(|(k, v)| {
            k.strip_prefix(ENV_PREFIX).map(|key| (key.to_string(), v))
        }));

        Ok(Self::with_overrides(overrides))
    }

    /// Resolve `key`, falling back to `default`.
    pub fn translate(&self, key: &str, default: &str) -> String {
        let key = key.to_ascii_uppercase();
        let value = self
            .overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| default.to_string());

        self.used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.clone());
        value
    }

    /// Every key looked up so far, with the value that was returned.
    pub fn export(&self) -> BTreeMap<String, String> {
        self.used
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write [`Translator::export`] as pretty JSON.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.export())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
