//! Delegate configuration, loaded from TOML.
//!
//! ```toml
//! [service]
//! base_url = "https://api.together.xyz/v1"
//! model = "meta-llama/Llama-Vision-Free"
//! api_key_env = "LLM_API_KEY"
//! temperature = 0.0
//! timeout_secs = 60
//!
//! [retry]
//! max_attempts = 3
//!
//! [personas]
//! Scanning = "You are a master diagnostic technician."
//! ```
//!
//! Every table and key is optional. The API key itself never appears in the
//! file; `api_key_env` names the environment variable that holds it.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use autoshop_contracts::{
    error::{ShopError, ShopResult},
    stage::StageId,
};
use autoshop_core::RetryPolicy;

use crate::persona::default_persona;

/// Connection settings for the chat-completions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
    pub temperature: f32,
    /// Whole-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.together.xyz/v1".to_string(),
            model: "meta-llama/Llama-Vision-Free".to_string(),
            api_key_env: "LLM_API_KEY".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    pub service: ServiceConfig,
    pub retry: RetryPolicy,
    /// Persona overrides keyed by stage name (`"Intake"`, `"QualityControl"`, ...).
    pub personas: BTreeMap<String, String>,
}

impl ShopConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `ShopError::Config` if the TOML is malformed, has unknown
    /// keys, or names a persona for a stage that does not exist.
    pub fn from_toml_str(s: &str) -> ShopResult<Self> {
        let config: ShopConfig = toml::from_str(s).map_err(|e| ShopError::Config {
            reason: format!("failed to parse config TOML: {}", e),
        })?;

        if let Some(unknown) = config
            .personas
            .keys()
            .find(|name| StageId::from_name(name).is_none())
        {
            return Err(ShopError::Config {
                reason: format!(
                    "persona given for unknown stage '{}' (expected one of: {})",
                    unknown,
                    StageId::ALL.map(|s| s.name()).join(", ")
                ),
            });
        }

        Ok(config)
    }

    /// Read the file at `path` and parse it with `from_toml_str`.
    pub fn from_file(path: &Path) -> ShopResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ShopError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The system message for `stage`: the override if one is set, the
    /// built-in persona otherwise.
    pub fn persona(&self, stage: StageId) -> &str {
        self.personas
            .get(stage.name())
            .map(String::as_str)
            .unwrap_or_else(|| default_persona(stage))
    }

    /// Read the API key from the environment variable named by
    /// `service.api_key_env`.
    pub fn api_key(&self) -> ShopResult<String> {
        let var = &self.service.api_key_env;
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => Err(ShopError::Config {
                reason: format!("environment variable '{}' is empty", var),
            }),
            Err(_) => Err(ShopError::Config {
                reason: format!("API key not found: set the '{}' environment variable", var),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use autoshop_contracts::{error::ShopError, stage::StageId};

    use super::ShopConfig;
    use crate::persona::default_persona;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ShopConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShopConfig::default());
        assert_eq!(config.service.api_key_env, "LLM_API_KEY");
        assert_eq!(config.service.timeout_secs, 60);
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = ShopConfig::from_toml_str(
            r#"
            [service]
            model = "local-model"
            base_url = "http://localhost:8080/v1"

            [retry]
            max_attempts = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.service.model, "local-model");
        assert_eq!(config.service.base_url, "http://localhost:8080/v1");
        assert_eq!(config.service.temperature, 0.0);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.initial_backoff_ms, 500);
    }

    #[test]
    fn persona_override_and_fallback() {
        let config = ShopConfig::from_toml_str(
            r#"
            [personas]
            Scanning = "You are a master diagnostic technician."
            "#,
        )
        .unwrap();
        assert_eq!(
            config.persona(StageId::Scanning),
            "You are a master diagnostic technician."
        );
        assert_eq!(
            config.persona(StageId::Storage),
            default_persona(StageId::Storage)
        );
    }

    #[test]
    fn unknown_persona_stage_rejected() {
        let err = ShopConfig::from_toml_str("[personas]\nWelding = \"x\"\n").unwrap_err();
        match err {
            ShopError::Config { reason } => {
                assert!(reason.contains("'Welding'"));
                assert!(reason.contains("QualityControl"));
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ShopConfig::from_toml_str("[service]\napi_key = \"secret\"\n").unwrap_err();
        assert!(matches!(err, ShopError::Config { .. }));
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let mut config = ShopConfig::default();
        config.service.api_key_env = "AUTOSHOP_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = config.api_key().unwrap_err();
        match err {
            ShopError::Config { reason } => {
                assert!(reason.contains("AUTOSHOP_TEST_KEY_THAT_IS_NEVER_SET"))
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ShopConfig::from_file(std::path::Path::new("/nonexistent/autoshop.toml"))
            .unwrap_err();
        assert!(matches!(err, ShopError::Config { .. }));
    }
}
