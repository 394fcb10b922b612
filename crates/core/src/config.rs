//! Structured configuration for operations.
//!
//! The configuration file is a YAML mapping from operation names to option values:
//!
//! ```yaml
//! args:
//!   text: hello
//!   number: 42
//! colors:
//!   scheme: campbell
//! ```
//!
//! JSON is valid YAML, so `{"args": {"text": "hello"}}` works too. Section and key
//! lookups ignore letter case.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Default path for the operations configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.opkit/settings.yml";

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `config_path_arg` - Optional custom configuration file path
///
/// # Returns
///
/// The resolved absolute path to the configuration file
///
/// # Examples
///
/// ```
/// use opkit_core::config::get_config_path;
///
/// // Use default path
/// let default_path = get_config_path(&None);
///
/// // Use custom path
/// let custom_path = get_config_path(&Some("/path/to/settings.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/settings.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path.as_str(),
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

/// Parsed configuration, keyed by operation name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    root: Mapping,
}

impl Configuration {
    /// Reads the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not valid YAML, or its top level
    /// is not a mapping.
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io_error("configuration".to_string(), path.to_string(), e))?;

        Self::parse(&text, "reading", path)
    }

    /// Reads the configuration file at `path`, treating a missing file as no configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_optional(path: &str) -> Result<Option<Self>> {
        if !Path::exists(Path::new(path)) {
            debug!("No configuration file at `{}`", path);
            return Ok(None);
        }

        Self::load(path).map(Some)
    }

    fn parse(text: &str, action: &str, origin: &str) -> Result<Self> {
        // An empty document
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(text).map_err(|e| {
            Error::yaml_error(
                action.to_string(),
                "configuration".to_string(),
                origin.to_string(),
                e,
            )
        })?;

        match value {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            _ => Err(Error::ConfigurationRoot {
                path: origin.to_string(),
            }),
        }
    }

    /// Finds the section for an operation, ignoring case.
    #[must_use]
    pub fn section(&self, operation_name: &str) -> Option<ConfigSection<'_>> {
        match find_key(&self.root, operation_name)? {
            Value::Mapping(values) => Some(ConfigSection {
                name: operation_name.to_string(),
                values,
            }),
            _ => {
                debug!(
                    "Configuration entry `{}` is not a mapping, it is ignored.",
                    operation_name
                );
                None
            }
        }
    }
}

impl FromStr for Configuration {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text, "parsing", "<inline>")
    }
}

/// The option values configured for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSection<'a> {
    name: String,
    values: &'a Mapping,
}

impl<'a> ConfigSection<'a> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw text for an option, ignoring key case.
    ///
    /// Scalars are turned into their text form, a sequence of scalars is joined with
    /// commas and nulls or nested mappings give `None`.
    #[must_use]
    pub fn get(&self, option_name: &str) -> Option<String> {
        let value = find_key(self.values, option_name)?;
        match value {
            Value::Sequence(items) => {
                let parts: Option<Vec<String>> = items.iter().map(scalar_text).collect();
                parts.map(|parts| parts.iter().join(","))
            }
            other => scalar_text(other),
        }
    }

    #[must_use]
    pub fn contains(&self, option_name: &str) -> bool {
        find_key(self.values, option_name).is_some()
    }
}

fn find_key<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
    mapping.iter().find_map(|(candidate, value)| match candidate {
        Value::String(candidate) if candidate.eq_ignore_ascii_case(key) => Some(value),
        _ => None,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
