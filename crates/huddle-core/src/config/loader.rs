//! Configuration loading and persistence.

use super::Config;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.embedding.api_key.is_empty() {
            errors.push("embedding.api_key is not set".to_string());
        }

        if self.embedding.dimension != super::EMBEDDING_DIMENSION {
            errors.push(format!(
                "embedding.dimension must be {}, got {}",
                super::EMBEDDING_DIMENSION,
                self.embedding.dimension
            ));
        }

        if self.retry.max_attempts == 0 {
            errors.push("retry.max_attempts must be at least 1".to_string());
        }

        if self.migration.concurrency == 0 {
            errors.push("migration.concurrency must be at least 1".to_string());
        }

        if self.index.api_key.is_empty() {
            errors.push("index.api_key is not set".to_string());
        }

        if self.index.workspace_host.is_empty() {
            errors.push("index.workspace_host is not set".to_string());
        }

        if self.index.agent_host.is_empty() {
            errors.push("index.agent_host is not set".to_string());
        }

        if self.firebase.database_url.is_empty() {
            errors.push("firebase.database_url is not set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
