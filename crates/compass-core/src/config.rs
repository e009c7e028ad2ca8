//! Runtime configuration for the plan store, auto-save and AI adapter.

use std::{path::PathBuf, time::Duration};

use crate::error::{CompassError, Result};

/// Directory prefix under the XDG base directories.
pub const APP_PREFIX: &str = "compass";

/// Default debounce window for auto-save.
pub const DEFAULT_AUTOSAVE_DEBOUNCE: Duration = Duration::from_secs(2);

/// Default timeout for one AI completion request.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(120);

/// Returns `$XDG_DATA_HOME/compass/<name>`, creating parent directories.
pub fn data_file(name: &str) -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix(APP_PREFIX)
        .place_data_file(name)
        .map_err(|e| CompassError::XdgDirectory(e.to_string()))
}

/// Auto-save tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveConfig {
    /// Quiet period after the last edit before a write happens
    pub debounce: Duration,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_AUTOSAVE_DEBOUNCE,
        }
    }
}

/// Connection settings for the AI completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// Endpoint accepting `{prompt, system_prompt, response_json_schema}`
    pub endpoint: Option<String>,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Master switch; generation is unavailable when false
    pub enabled: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout: DEFAULT_AI_TIMEOUT,
            enabled: true,
        }
    }
}

impl AiConfig {
    /// AI generation is offered only when enabled and an endpoint is set.
    pub fn is_available(&self) -> bool {
        self.enabled && self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}
