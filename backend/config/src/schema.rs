//! CardForge runtime configuration schema.
//!
//! All fields are optional in the file; accessors return hard defaults so
//! the service runs with an empty or missing config.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default HTTP bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision model used for card extraction.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";

/// Default model used for summary illustration generation.
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";

/// Default log level when neither config nor `RUST_LOG` say otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration for CardForge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardForgeConfig {
    /// Gateway server configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Record and image storage locations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    /// OpenAI provider configuration (extraction + illustration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Directory holding the card CSV and stored images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the built front-end bundle, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl CardForgeConfig {
    pub fn host(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    /// Data directory; defaults to `<config dir>/data`.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|s| s.data_dir.clone())
            .unwrap_or_else(|| crate::io::config_dir().join("data"))
    }

    /// Directory for uploaded and generated images.
    pub fn image_dir(&self) -> PathBuf {
        self.data_dir().join("images")
    }

    /// Path to the card CSV file.
    pub fn cards_file(&self) -> PathBuf {
        self.data_dir().join("cards.csv")
    }

    pub fn frontend_dir(&self) -> Option<PathBuf> {
        self.storage.as_ref().and_then(|s| s.frontend_dir.clone())
    }

    pub fn openai_api_key(&self) -> Option<String> {
        self.openai.as_ref().and_then(|o| o.api_key.clone())
    }

    pub fn openai_base_url(&self) -> String {
        self.openai
            .as_ref()
            .and_then(|o| o.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn vision_model(&self) -> String {
        self.openai
            .as_ref()
            .and_then(|o| o.vision_model.clone())
            .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string())
    }

    pub fn image_model(&self) -> String {
        self.openai
            .as_ref()
            .and_then(|o| o.image_model.clone())
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string())
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Log directory; defaults to `<config dir>/logs`.
    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.clone())
            .unwrap_or_else(|| crate::io::config_dir().join("logs"))
    }

    /// Overlay values from the process environment onto the loaded file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(&std::env::vars().collect());
    }

    /// Overlay overrides from a provided map (useful for testing).
    pub fn apply_env_overrides_from(&mut self, env: &HashMap<String, String>) {
        if let Some(host) = env.get("CARDFORGE_BIND") {
            self.server.get_or_insert_with(Default::default).host = Some(host.clone());
        }
        if let Some(port) = env.get("CARDFORGE_PORT").and_then(|p| p.parse().ok()) {
            self.server.get_or_insert_with(Default::default).port = Some(port);
        }
        if let Some(dir) = env.get("CARDFORGE_DATA_DIR") {
            self.storage.get_or_insert_with(Default::default).data_dir =
                Some(PathBuf::from(dir));
        }
        if let Some(key) = env.get("OPENAI_API_KEY") {
            self.openai.get_or_insert_with(Default::default).api_key = Some(key.clone());
        }
        if let Some(url) = env.get("OPENAI_BASE_URL") {
            self.openai.get_or_insert_with(Default::default).base_url = Some(url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let config = CardForgeConfig::default();
        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.vision_model(), DEFAULT_VISION_MODEL);
        assert_eq!(config.image_model(), DEFAULT_IMAGE_MODEL);
        assert_eq!(config.openai_base_url(), DEFAULT_BASE_URL);
        assert!(config.openai_api_key().is_none());
    }

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
server:
  port: 9090
storage:
  dataDir: /tmp/cardforge-data
openai:
  visionModel: gpt-4o
"#;
        let config: CardForgeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.port(), 9090);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/cardforge-data"));
        assert_eq!(config.cards_file(), PathBuf::from("/tmp/cardforge-data/cards.csv"));
        assert_eq!(config.vision_model(), "gpt-4o");
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = CardForgeConfig::default();
        let env: HashMap<String, String> = [
            ("CARDFORGE_PORT".to_string(), "3000".to_string()),
            ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
        ]
        .into_iter()
        .collect();
        config.apply_env_overrides_from(&env);
        assert_eq!(config.port(), 3000);
        assert_eq!(config.openai_api_key().as_deref(), Some("sk-test"));
    }

    #[test]
    fn unparseable_port_override_is_ignored() {
        let mut config = CardForgeConfig::default();
        let env: HashMap<String, String> =
            [("CARDFORGE_PORT".to_string(), "not-a-port".to_string())]
                .into_iter()
                .collect();
        config.apply_env_overrides_from(&env);
        assert_eq!(config.port(), DEFAULT_PORT);
    }
}
