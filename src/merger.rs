//! Builder that collects ordered merge sources and merges them on demand.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::env_config::{align_keys, env_overrides, env_overrides_with_env, DEFAULT_SEPARATOR};
use crate::error::{MergeOptionsError, Result};
use crate::file_config::{load_json_file, load_optional_json_file};
use crate::merge::{merge_options, merge_options_into};

/// Ordered collection of option sources.
///
/// Sources merge left to right in the order they were added. The env
/// overlay is off until a prefix is set; it is read at merge time and always
/// applied last.
#[derive(Default)]
pub struct OptionsMerger {
    sources: Vec<Value>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    env_override: Option<HashMap<String, String>>,
}

impl OptionsMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an in-memory value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.sources.push(value);
        self
    }

    /// Append a value serialized from any `Serialize` type.
    pub fn with_serialized<T: Serialize>(self, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(MergeOptionsError::Serialize)?;
        Ok(self.with_value(value))
    }

    /// Append a value parsed from a JSON string.
    pub fn with_json_str(self, json: &str) -> Result<Self> {
        let value = serde_json::from_str(json).map_err(|e| MergeOptionsError::Parse {
            origin: "inline JSON".to_string(),
            source: e,
        })?;
        Ok(self.with_value(value))
    }

    /// Append a JSON file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let value = load_json_file(path.as_ref())?;
        Ok(self.with_value(value))
    }

    /// Append a JSON file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self> {
        match load_optional_json_file(path.as_ref())? {
            Some(value) => Ok(self.with_value(value)),
            None => Ok(self),
        }
    }

    /// Apply variables starting with `prefix` last. An empty prefix turns
    /// the overlay off.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string()).filter(|p| !p.is_empty());
        self
    }

    /// Set the key path separator used by the env overlay.
    pub fn with_env_separator(mut self, separator: &str) -> Self {
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Read the env overlay from `env` instead of the process environment.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env_override = Some(env);
        self
    }

    /// Number of explicit sources added so far (the env overlay excluded).
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Merge every source into a new object. Never fails.
    pub fn merge(&self) -> Map<String, Value> {
        let mut merged = merge_options(&self.sources);
        if let Some(prefix) = &self.env_prefix {
            let separator = self.env_separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            let overrides = match &self.env_override {
                Some(env) => env_overrides_with_env(prefix, separator, env),
                None => env_overrides(prefix, separator),
            };
            tracing::debug!(keys = overrides.len(), prefix = %prefix, "applying env overlay");
            let overrides = align_keys(overrides, &merged);
            merge_options_into(&mut merged, &Value::Object(overrides));
        }
        tracing::trace!(sources = self.sources.len(), keys = merged.len(), "merged options");
        merged
    }

    pub fn merge_value(&self) -> Value {
        Value::Object(self.merge())
    }

    /// Merge and deserialize into a typed options struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.merge_value()).map_err(MergeOptionsError::Deserialize)
    }
}

/// Overlay `overrides` onto typed `defaults` and read the result back.
pub fn merge_typed<T>(defaults: &T, overrides: &[Value]) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merger = OptionsMerger::new().with_serialized(defaults)?;
    for value in overrides {
        merger = merger.with_value(value.clone());
    }
    merger.deserialize()
}
