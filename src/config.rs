use crate::filter::{FieldList, FilterOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub filter: FilterRules,
    pub output: OutputRules,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            filter: FilterRules::default(),
            output: OutputRules::default(),
        }
    }
}

impl SearchConfig {
    /// Configured default fields, if any
    pub fn default_fields(&self) -> Option<FieldList> {
        if self.filter.default_fields.is_empty() {
            None
        } else {
            Some(self.filter.default_fields.iter().map(String::as_str).collect())
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::new().case_sensitive(self.filter.case_sensitive)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterRules {
    /// Fields searched by phrases without a `field:` scope
    pub default_fields: Vec<String>,
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputRules {
    /// Columns shown in the text table
    pub columns: Vec<String>,
}

pub fn load_config(path: Option<&Path>) -> Result<SearchConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SearchConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<SearchConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static SearchConfig {
    static DEFAULT_CONFIG: LazyLock<SearchConfig> = LazyLock::new(SearchConfig::default);
    &DEFAULT_CONFIG
}
