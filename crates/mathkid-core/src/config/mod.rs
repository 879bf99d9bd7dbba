//! Configuration management

use crate::error::{MathKidError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Secondary API key variable, checked when `GOOGLE_API_KEY` is unset
pub const API_KEY_FALLBACK_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "MATHKID_CONFIG";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_PERSONA: &str = "You are a teacher of a pre-teen who does not know much yet and is deaf, \
so explain things in an easy way, using images and formulas when possible to show how to reach the \
final result with examples. Avoid many words, because the student cannot read and understand much. \
If the question is not about mathematics, answer: The question must be about mathematics";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Generation service connection settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Persona attached to every generation call
    #[serde(default)]
    pub persona: PromptConfig,

    /// Pipeline behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the Gemini REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; the environment takes precedence over the file
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for text prompts
    #[serde(default = "default_model")]
    pub text_model: String,

    /// Model used when the question arrives as an image
    #[serde(default = "default_model")]
    pub vision_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            text_model: default_model(),
            vision_model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ServiceConfig {
    /// Return the API key or fail with the missing-configuration error
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(MathKidError::Config(format!(
                "the {} environment variable is not set; configure an API key to use the generation service",
                API_KEY_ENV
            ))),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

/// Persona (system instruction) shared by every service call.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_persona")]
    pub system_instruction: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_persona(),
        }
    }
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run example generation and answer resolution concurrently
    #[serde(default = "default_true")]
    pub concurrent_followups: bool,

    /// Directory for temporary upload files (system temp dir when unset)
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrent_followups: true,
            upload_dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from the default path and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save config to the given path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config path (`MATHKID_CONFIG` or the user config dir)
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Overlay environment variables on top of file values
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV).or_else(|| non_empty(API_KEY_FALLBACK_ENV)) {
            self.service.api_key = Some(key);
        }
        if let Some(url) = non_empty("MATHKID_BASE_URL") {
            self.service.base_url = url;
        }
        if let Some(model) = non_empty("MATHKID_TEXT_MODEL") {
            self.service.text_model = model;
        }
        if let Some(model) = non_empty("MATHKID_VISION_MODEL") {
            self.service.vision_model = model;
        }
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.service.api_key.is_some() {
            copy.service.api_key = Some("********".to_string());
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.service.text_model, "gemini-2.0-flash");
        assert_eq!(config.service.vision_model, "gemini-2.0-flash");
        assert!(config.service.api_key.is_none());
        assert!(config.pipeline.concurrent_followups);
        assert!(config
            .persona
            .system_instruction
            .contains("The question must be about mathematics"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "service:\n  text_model: gemini-1.5-pro\npipeline:\n  concurrent_followups: false\n";
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.service.text_model, "gemini-1.5-pro");
        assert_eq!(config.service.vision_model, "gemini-2.0-flash");
        assert_eq!(config.service.timeout_secs, 60);
        assert!(!config.pipeline.concurrent_followups);
        assert_eq!(config.persona, PromptConfig::default());
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = ServiceConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, MathKidError::Config(_)));
        assert!(err.to_string().contains(API_KEY_ENV));

        let blank = ServiceConfig {
            api_key: Some("   ".to_string()),
            ..ServiceConfig::default()
        };
        assert!(blank.require_api_key().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config =
            Config::from_yaml("service:\n  api_key: from-file\n  base_url: http://file\n").unwrap();
        let vars = env(&[
            ("GOOGLE_API_KEY", "from-env"),
            ("MATHKID_VISION_MODEL", "gemini-vision-test"),
        ]);
        config.apply_env(|k| vars.get(k).cloned());

        assert_eq!(config.service.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.service.base_url, "http://file");
        assert_eq!(config.service.vision_model, "gemini-vision-test");
    }

    #[test]
    fn test_fallback_api_key_env() {
        let mut config = Config::default();
        let vars = env(&[("GOOGLE_API_KEY", ""), ("GEMINI_API_KEY", "secondary")]);
        config.apply_env(|k| vars.get(k).cloned());
        assert_eq!(config.service.require_api_key().unwrap(), "secondary");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let mut config = Config::default();
        config.pipeline.upload_dir = Some(PathBuf::from("/tmp/mathkid"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.pipeline.upload_dir, Some(PathBuf::from("/tmp/mathkid")));
        assert!(Config::load_from(&dir.path().join("missing.yml")).is_ok());
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = Config::default();
        config.service.api_key = Some("secret-key".to_string());
        let shown = serde_yaml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("secret-key"));
        assert!(shown.contains("********"));
    }
}
