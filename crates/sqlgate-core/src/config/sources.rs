//! Raw configuration sources.
//!
//! Settings arrive as plain strings from a YAML file and from the process
//! environment. They are collected here without interpretation; the truthy
//! parse happens once in [`PolicyConfig::from_map`].

use super::{ConfigError, POLICY_KEYS, PolicyConfig};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Raw key/value settings gathered from one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    values: HashMap<String, String>,
}

impl ConfigSources {
    /// Create an empty set of settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let sources = Self::from_yaml(&content)?;
        tracing::debug!(
            path = %path.display(),
            keys = sources.values.len(),
            "Loaded policy settings from file"
        );
        Ok(sources)
    }

    /// Parse settings from YAML content.
    ///
    /// The settings live under a top-level `policy` mapping:
    ///
    /// ```yaml
    /// policy:
    ///   ALLOW_DDL_OPERATIONS: "true"
    ///   BLOCK_DANGEROUS_KEYWORDS: false
    /// ```
    ///
    /// Booleans and numbers are kept in their string form so they go through
    /// the same parse as environment values. Null entries are skipped.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(content)?;

        let policy = match &document {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(root) => match root.get("policy") {
                None | Some(Value::Null) => return Ok(Self::new()),
                Some(Value::Mapping(policy)) => policy,
                Some(_) => {
                    return Err(ConfigError::Config(
                        "'policy' must be a mapping of setting names to values".to_string(),
                    ));
                }
            },
            _ => {
                return Err(ConfigError::Config(
                    "configuration file must be a mapping".to_string(),
                ));
            }
        };

        let mut values = HashMap::new();
        for (key, value) in policy {
            let Some(key) = key.as_str() else {
                return Err(ConfigError::Config(format!(
                    "policy setting names must be strings, got {:?}",
                    key
                )));
            };
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                _ => {
                    return Err(ConfigError::Config(format!(
                        "policy setting '{}' must be a scalar value",
                        key
                    )));
                }
            };
            values.insert(key.to_string(), value);
        }

        Ok(Self { values })
    }

    /// Collect the recognized policy keys from the process environment.
    pub fn from_env() -> Self {
        let sources = Self::from_vars(std::env::vars());
        tracing::debug!(
            keys = sources.values.len(),
            "Loaded policy settings from environment"
        );
        sources
    }

    /// Collect the recognized policy keys from an iterator of variables.
    ///
    /// Anything that is not one of the policy keys is dropped, so the whole
    /// environment can be passed in.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| POLICY_KEYS.contains(&k.as_str()))
            .collect();
        Self { values }
    }

    /// Overlay `other` on top of these settings. Keys in `other` win.
    pub fn merge(mut self, other: ConfigSources) -> Self {
        self.values.extend(other.values);
        self
    }

    /// Set a single raw value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a single raw value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The raw key/value map, as handed to the gate.
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Resolve the collected settings into a typed policy.
    pub fn resolve(&self) -> PolicyConfig {
        PolicyConfig::from_map(&self.values)
    }
}
