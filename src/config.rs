use crate::events::SearchField;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before filtering
    pub debounce_ms: u64,
    pub search_field: SearchField,
    /// Shown instead of the date for events starting today
    pub today_label: String,
    /// Page that shared links point to
    pub link_base: String,
    /// Shown above the list when no query is active
    pub empty_state_label: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            search_field: SearchField::Details,
            today_label: "Heute".to_string(),
            link_base: "index.html".to_string(),
            empty_state_label: "All upcoming events".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
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
