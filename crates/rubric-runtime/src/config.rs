//! Runtime configuration.
//!
//! Loaded from YAML/JSON, or from defaults overlaid with environment
//! variables. Durations are human-readable ("30m", "1h 30m").

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::RuntimeError;

/// Maximum cached point tables.
pub const CACHE_MAX_RUBRICS_ENV: &str = "RUBRIC_CACHE_MAX_RUBRICS";

/// Idle expiry of cached point tables; a humantime string or `off`.
pub const CACHE_TIME_TO_IDLE_ENV: &str = "RUBRIC_CACHE_TIME_TO_IDLE";

/// Point table cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of rubrics whose tables are kept
    pub max_rubrics: u64,

    /// Evict a table after this long without a lookup. `None` (the default)
    /// keeps each table for the life of the cache, so it is built once.
    #[serde(with = "duration_human")]
    pub time_to_idle: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_rubrics: 10_000,
            time_to_idle: None,
        }
    }
}

/// Configuration for [`RubricRuntime`](crate::RubricRuntime).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub cache: CacheConfig,
}

impl RuntimeConfig {
    /// Defaults overlaid with `RUBRIC_CACHE_*` environment variables.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RuntimeError> {
        let mut config = Self::default();

        if let Some(value) = lookup(CACHE_MAX_RUBRICS_ENV) {
            config.cache.max_rubrics = value.trim().parse().map_err(|e| {
                RuntimeError::Config(format!("{}={:?}: {}", CACHE_MAX_RUBRICS_ENV, value, e))
            })?;
        }

        if let Some(value) = lookup(CACHE_TIME_TO_IDLE_ENV) {
            config.cache.time_to_idle = duration_human::parse(&value).map_err(|e| {
                RuntimeError::Config(format!("{}={:?}: {}", CACHE_TIME_TO_IDLE_ENV, value, e))
            })?;
        }

        Ok(config)
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RuntimeError> {
        serde_yaml::from_str(yaml).map_err(|e| RuntimeError::Config(e.to_string()))
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RuntimeError> {
        serde_json::from_str(json).map_err(|e| RuntimeError::Config(e.to_string()))
    }

    /// Read from a file; `.yaml`/`.yml` are YAML, anything else JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| RuntimeError::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }
}

mod duration_human {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn parse(value: &str) -> Result<Option<Duration>, humantime::DurationError> {
        match value.trim() {
            "off" | "none" => Ok(None),
            text => humantime::parse_duration(text).map(Some),
        }
    }

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_str(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_str("off"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.cache.max_rubrics, 10_000);
        assert_eq!(config.cache.time_to_idle, None);
    }

    #[test]
    fn test_config_from_yaml() {
        let config = RuntimeConfig::from_yaml(
            r#"
cache:
  max_rubrics: 50
  time_to_idle: "1h 30m"
"#,
        )
        .unwrap();
        assert_eq!(config.cache.max_rubrics, 50);
        assert_eq!(config.cache.time_to_idle, Some(Duration::from_secs(5400)));
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = RuntimeConfig::from_json(r#"{"cache": {"time_to_idle": "10m"}}"#).unwrap();
        assert_eq!(config.cache.max_rubrics, 10_000);
        assert_eq!(config.cache.time_to_idle, Some(Duration::from_secs(600)));

        let config = RuntimeConfig::from_json(r#"{"cache": {"time_to_idle": "off"}}"#).unwrap();
        assert_eq!(config.cache.time_to_idle, None);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = RuntimeConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("off"));
        assert_eq!(RuntimeConfig::from_yaml(&yaml).unwrap(), config);

        config.cache.time_to_idle = Some(Duration::from_secs(3600));
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("1h"));
        assert_eq!(RuntimeConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_config_bad_duration() {
        assert!(matches!(
            RuntimeConfig::from_json(r#"{"cache": {"time_to_idle": "soon"}}"#),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    fn test_config_from_env_lookup() {
        let env = HashMap::from([
            (CACHE_MAX_RUBRICS_ENV, "12"),
            (CACHE_TIME_TO_IDLE_ENV, "30s"),
        ]);
        let config =
            RuntimeConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.cache.max_rubrics, 12);
        assert_eq!(config.cache.time_to_idle, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_from_env_rejects_garbage() {
        let result = RuntimeConfig::from_lookup(|key| {
            (key == CACHE_MAX_RUBRICS_ENV).then(|| "many".to_string())
        });
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }
}
