use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;

use docdb_interface::documents::model::OfferTier;
use docdb_interface::errors::{AppError, Result};

const ENV_PREFIX: &str = "DOCDB";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logger {
    pub level: String,
}

// Credentials of the hosted document service. Both values are checked at first
// use so that a missing key is reported before any connection is attempted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // EndPointUrl
    pub end_point_url: String,
    // AuthorizationKey
    pub authorization_key: String,
    pub account_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sample {
    pub database_name: String,
    pub collection_name: String,
    pub offer_tier: OfferTier,
    pub create_collection: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logger: Logger,
    pub app_settings: AppSettings,
    pub sample: Sample,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let config = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        };

        let builder = Config::builder()
            .add_source(File::with_name(&format!("config/{config}")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::build(builder.build())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let builder = Config::builder().add_source(File::from_str(content, FileFormat::Toml));

        Self::build(builder.build())
    }

    fn build(config: std::result::Result<Config, ConfigError>) -> Result<Self> {
        config
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::ConfigurationError { msg: e.to_string() })
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<()> {
        let url = self.end_point_url.trim();

        if url.is_empty() {
            return Err(AppError::ConfigurationError {
                msg: "EndPointUrl is missing".to_string(),
            });
        }

        if !(url.starts_with("mongodb://") || url.starts_with("mongodb+srv://")) {
            return Err(AppError::ConfigurationError {
                msg: format!(
                    "EndPointUrl '{}' must use the mongodb:// or mongodb+srv:// scheme",
                    url
                ),
            });
        }

        if self.authorization_key.trim().is_empty() {
            return Err(AppError::ConfigurationError {
                msg: "AuthorizationKey is missing".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            database_name: "TestDB".to_string(),
            collection_name: "TestCollection1".to_string(),
            offer_tier: OfferTier::S1,
            create_collection: true,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{} ({})",
            self.database_name,
            self.collection_name,
            self.offer_tier.as_str()
        )
    }
}
