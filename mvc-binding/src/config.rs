//! Binding options and options-file resolution
//!
//! Options file resolution priority:
//! 1. Explicit path (command-line argument, highest priority)
//! 2. `MVC_BINDING_CONFIG` environment variable
//! 3. `<platform config dir>/mvc-binding/binding.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing file is NOT fatal: a warning is logged and compiled defaults
//! are used. A file that exists but does not parse or validate is an error.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::model_state::DEFAULT_MAX_ALLOWED_ERRORS;
use crate::source::BindingSource;
use crate::{Error, Result};

/// Environment variable naming an options file
pub const CONFIG_ENV_VAR: &str = "MVC_BINDING_CONFIG";

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "binding.toml";

/// Default recursion cap for nested models
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 32;

/// Default cap on bound collection elements
pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 1024;

/// Engine-wide binding options
///
/// # Example TOML
///
/// ```toml
/// provider_order = ["route", "query", "form"]
/// max_allowed_errors = 200
/// max_recursion_depth = 32
/// max_collection_size = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingOptions {
    /// Value provider priority, highest first
    pub provider_order: Vec<BindingSource>,
    /// Cap on model-state errors per request
    pub max_allowed_errors: usize,
    /// Cap on nested model depth
    pub max_recursion_depth: usize,
    /// Cap on elements bound into one collection
    pub max_collection_size: usize,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            provider_order: vec![BindingSource::Route, BindingSource::Query, BindingSource::Form],
            max_allowed_errors: DEFAULT_MAX_ALLOWED_ERRORS,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            max_collection_size: DEFAULT_MAX_COLLECTION_SIZE,
        }
    }
}

impl BindingOptions {
    /// Parse and validate options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: BindingOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate an options file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Toml(err) => Error::Configuration(format!("{}: {}", path.display(), err)),
            other => other,
        })
    }

    /// Reject options the engine cannot run with
    ///
    /// - every limit must be at least 1
    /// - `provider_order` may only hold route, query and form, each once
    pub fn validate(&self) -> Result<()> {
        if self.max_allowed_errors == 0 {
            return Err(Error::Configuration("max_allowed_errors must be at least 1".to_string()));
        }
        if self.max_recursion_depth == 0 {
            return Err(Error::Configuration("max_recursion_depth must be at least 1".to_string()));
        }
        if self.max_collection_size == 0 {
            return Err(Error::Configuration("max_collection_size must be at least 1".to_string()));
        }

        let mut seen = HashSet::new();
        for source in &self.provider_order {
            match source {
                BindingSource::Route | BindingSource::Query | BindingSource::Form => {}
                other => {
                    return Err(Error::Configuration(format!(
                        "provider_order: '{}' is not a built-in value provider source",
                        other
                    )))
                }
            }
            if !seen.insert(source) {
                return Err(Error::Configuration(format!(
                    "provider_order: '{}' listed more than once",
                    source
                )));
            }
        }

        Ok(())
    }
}

/// Platform default options file path, if a config directory exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mvc-binding").join(CONFIG_FILE_NAME))
}

/// Resolve which options file to read
///
/// Returns `None` when no candidate is named and the platform default
/// does not exist.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// Load options following the resolution priority
///
/// Falls back to compiled defaults when no file is found.
pub fn load_options(cli_arg: Option<&Path>) -> Result<BindingOptions> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No binding options file found, using compiled defaults");
        return Ok(BindingOptions::default());
    };

    if !path.exists() {
        warn!(
            path = %path.display(),
            "Binding options file not found, using compiled defaults"
        );
        return Ok(BindingOptions::default());
    }

    let options = BindingOptions::load_from_file(&path)?;
    info!(path = %path.display(), "Loaded binding options");
    Ok(options)
}
