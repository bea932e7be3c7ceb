use crate::core::sequencer::PersistenceMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub board: Option<BoardConfig>,
    pub persistence: Option<PersistenceConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub mode: Option<PersistenceMode>,
    pub optimistic: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

pub const MAX_TIMEOUT_SECONDS: u64 = 600;

impl TomlConfig {
    /// Loads a config file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses config text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        self.persistence
            .as_ref()
            .and_then(|p| p.mode)
            .unwrap_or_default()
    }

    pub fn optimistic(&self) -> bool {
        self.persistence
            .as_ref()
            .and_then(|p| p.optimistic)
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn board_id(&self) -> Option<u64> {
        self.board.as_ref().map(|b| b.id)
    }

    fn auth_token(&self) -> Option<&str> {
        self.api.auth_token.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.api.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;

        if let Some(token) = &self.api.auth_token {
            validation::validate_non_empty_string("api.auth_token", token)?;
        }

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_range("api.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://boards.example.com/api/v1"
auth_token = "123"
timeout_seconds = 30

[board]
id = 12

[persistence]
mode = "combined"
optimistic = true

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_base_url(), "https://boards.example.com/api/v1");
        assert_eq!(config.board_id(), Some(12));
        assert_eq!(config.auth_token(), Some("123"));
        assert_eq!(config.timeout_seconds(), Some(30));
        assert_eq!(config.persistence_mode(), PersistenceMode::Combined);
        assert!(config.optimistic());
        assert!(config.verbose());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8000"
"#,
        )
        .unwrap();

        assert_eq!(config.board_id(), None);
        assert_eq!(config.persistence_mode(), PersistenceMode::Stepwise);
        assert!(!config.optimistic());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BOARD_REORDER_TEST_URL", "https://env.example.com");

        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "${BOARD_REORDER_TEST_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com");

        std::env::remove_var("BOARD_REORDER_TEST_URL");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost"
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let result = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost"

[persistence]
mode = "eventually"
"#,
        );
        assert!(matches!(
            result,
            Err(BoardError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"http://localhost:9000\"\n\n[board]\nid = 4\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.board_id(), Some(4));
    }
}
