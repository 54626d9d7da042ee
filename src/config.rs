use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::analysis::{HashtagConfig, RecommendationConfig};
use crate::{AnalyticsError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub hashtags: HashtagConfig,
    pub recommendations: RecommendationConfig,
    pub logging: LoggingConfig,
}

impl AnalyticsConfig {
    /// Loads the config file if it exists, then applies environment
    /// overrides. Returns the path that was consulted.
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => Self::read(path)?,
            _ => AnalyticsConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            AnalyticsError::Config(format!("failed to read {}: {}", path.display(), err))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|err| AnalyticsError::Config(format!("failed to parse config: {}", err)))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(limit) = env::var("ANALYTICS_HASHTAG_LIMIT") {
            if let Ok(value) = limit.parse::<usize>() {
                self.hashtags.limit = value;
            }
        }
        if let Ok(multiplier) = env::var("ANALYTICS_ENGAGEMENT_MULTIPLIER") {
            if let Ok(value) = multiplier.parse::<f64>() {
                self.recommendations.engagement_multiplier = value;
            }
        }
        if let Ok(multiplier) = env::var("ANALYTICS_FREQUENCY_MULTIPLIER") {
            if let Ok(value) = multiplier.parse::<f64>() {
                self.recommendations.frequency_multiplier = value;
            }
        }
        if let Ok(level) = env::var("ANALYTICS_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logging.level = level;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ANALYTICS_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/analytics.toml")))
}
