use serde::Deserialize;

use crate::domain::{
    ApiKeyValidationOptions, ApiKeyValidator, PackageConsumerValidator, RecordPurpose,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Validation modes that depend on how the target server is set up
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Server hashes API keys, so `key` may never be sent
    pub key_hashing: bool,
    /// Require package consumer URLs to parse
    pub strict_urls: bool,
    pub purpose: RecordPurpose,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ValidationConfig {
    pub fn api_key_validator(&self) -> ApiKeyValidator {
        ApiKeyValidator::new(ApiKeyValidationOptions {
            purpose: self.purpose,
            key_hashing: self.key_hashing.into(),
        })
    }

    pub fn package_consumer_validator(&self) -> PackageConsumerValidator {
        PackageConsumerValidator::new(self.strict_urls.into())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CONTRACTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
