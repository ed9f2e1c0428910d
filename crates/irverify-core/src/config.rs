//! Harness configuration.
//!
//! Validated at load time with sensible defaults, so a suite can check in a
//! partial `irverify.toml` and leave the rest to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::VerifierOptions;
use crate::error::{CoreError, Result};
use crate::module::ModuleConfig;

/// Configuration for a verifying test harness.
///
/// ```toml
/// default_module_name = "test_module"
///
/// [verifier]
/// layout_sensitive = true
///
/// [module]
/// replica_count = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Verifier strictness.
    #[serde(default)]
    pub verifier: VerifierOptions,

    /// Configuration used for modules created through the factory.
    #[serde(default)]
    pub module: ModuleConfig,

    /// Name given to the primary module and to `create_default_module`.
    #[serde(default = "default_module_name")]
    pub default_module_name: String,
}

fn default_module_name() -> String {
    "test_module".to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            verifier: VerifierOptions::default(),
            module: ModuleConfig::default(),
            default_module_name: default_module_name(),
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration with the given verifier strictness.
    #[must_use]
    pub fn new(layout_sensitive: bool, allow_mixed_precision: bool) -> Self {
        Self {
            verifier: VerifierOptions::new(layout_sensitive, allow_mixed_precision),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.default_module_name.trim().is_empty() {
            return Err(CoreError::config("default_module_name cannot be empty"));
        }
        self.module.validate()?;
        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error if the text cannot be parsed or fails validation.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CoreError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::config(format!("failed to read config: {e}")))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            layout_sensitive = config.verifier.layout_sensitive,
            allow_mixed_precision = config.verifier.allow_mixed_precision,
            "loaded harness config"
        );
        Ok(config)
    }
}
