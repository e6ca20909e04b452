use crate::error::{ParcelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the property catalog
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Zone radius in meters used for statistics when the request has none
    pub zone_size_m: ConfigValue<f64>,
    /// Directory holding downloaded property images
    pub image_dir: ConfigValue<PathBuf>,
    /// Upper bound on a single geometry store call
    pub query_timeout_secs: ConfigValue<u64>,
    /// Upper bound on a single remote image download
    pub image_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            zone_size_m: ConfigValue::new(
                crate::models::DEFAULT_ZONE_SIZE_M,
                ConfigSource::Default,
            ),
            image_dir: ConfigValue::new(env::temp_dir(), ConfigSource::Default),
            query_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
            image_timeout_secs: ConfigValue::new(60, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ParcelError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ParcelError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(zone_size_m) = file_config.zone_size_m {
            self.zone_size_m.update(parse_zone_size(zone_size_m)?, ConfigSource::File);
        }

        if let Some(image_dir) = file_config.image_dir {
            self.image_dir.update(image_dir, ConfigSource::File);
        }

        if let Some(secs) = file_config.query_timeout_secs {
            self.query_timeout_secs
                .update(parse_timeout_secs("query_timeout_secs", secs)?, ConfigSource::File);
        }

        if let Some(secs) = file_config.image_timeout_secs {
            self.image_timeout_secs
                .update(parse_timeout_secs("image_timeout_secs", secs)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // PARCELGEO_ZONE_SIZE_M
        if let Ok(zone_str) = env::var("PARCELGEO_ZONE_SIZE_M") {
            match zone_str.parse::<f64>().ok().and_then(|v| parse_zone_size(v).ok()) {
                Some(zone) => self.zone_size_m.update(zone, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid PARCELGEO_ZONE_SIZE_M value '{}': expected a positive number of meters",
                    zone_str
                ),
            }
        }

        // PARCELGEO_IMAGE_DIR
        if let Ok(dir) = env::var("PARCELGEO_IMAGE_DIR") {
            if dir.trim().is_empty() {
                tracing::warn!("Ignoring empty PARCELGEO_IMAGE_DIR");
            } else {
                self.image_dir.update(PathBuf::from(dir), ConfigSource::Environment);
            }
        }

        // PARCELGEO_QUERY_TIMEOUT_SECS
        if let Ok(secs_str) = env::var("PARCELGEO_QUERY_TIMEOUT_SECS") {
            match secs_str.parse::<u64>().ok().filter(|s| *s > 0) {
                Some(secs) => self.query_timeout_secs.update(secs, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid PARCELGEO_QUERY_TIMEOUT_SECS value '{}': expected a positive integer",
                    secs_str
                ),
            }
        }

        // PARCELGEO_IMAGE_TIMEOUT_SECS
        if let Ok(secs_str) = env::var("PARCELGEO_IMAGE_TIMEOUT_SECS") {
            match secs_str.parse::<u64>().ok().filter(|s| *s > 0) {
                Some(secs) => self.image_timeout_secs.update(secs, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid PARCELGEO_IMAGE_TIMEOUT_SECS value '{}': expected a positive integer",
                    secs_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(zone_size_m) = overrides.zone_size_m {
            self.zone_size_m.update(zone_size_m, ConfigSource::Cli);
        }

        if let Some(image_dir) = overrides.image_dir {
            self.image_dir.update(image_dir, ConfigSource::Cli);
        }

        if let Some(secs) = overrides.query_timeout_secs {
            self.query_timeout_secs.update(secs, ConfigSource::Cli);
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.value)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "zone_size_m".to_string(),
            (self.zone_size_m.value.to_string(), self.zone_size_m.source),
        );

        map.insert(
            "image_dir".to_string(),
            (self.image_dir.value.display().to_string(), self.image_dir.source),
        );

        map.insert(
            "query_timeout_secs".to_string(),
            (self.query_timeout_secs.value.to_string(), self.query_timeout_secs.source),
        );

        map.insert(
            "image_timeout_secs".to_string(),
            (self.image_timeout_secs.value.to_string(), self.image_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    zone_size_m: Option<f64>,
    image_dir: Option<PathBuf>,
    query_timeout_secs: Option<u64>,
    image_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub zone_size_m: Option<f64>,
    pub image_dir: Option<PathBuf>,
    pub query_timeout_secs: Option<u64>,
}

/// Validate a zone radius: finite and strictly positive
pub fn parse_zone_size(value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParcelError::ConfigInvalid {
            key: "zone_size_m".to_string(),
            reason: format!("Zone size must be a positive number of meters, got {}", value),
        })
    }
}

fn parse_timeout_secs(key: &str, value: u64) -> Result<u64> {
    if value == 0 {
        return Err(ParcelError::ConfigInvalid {
            key: key.to_string(),
            reason: "Timeout must be at least 1 second".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.zone_size_m.value, 10.0);
        assert_eq!(config.zone_size_m.source, ConfigSource::Default);
        assert_eq!(config.image_dir.value, env::temp_dir());
        assert_eq!(config.query_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
zone_size_m = 25.0
image_dir = "/var/cache/parcelgeo"
query_timeout_secs = 5
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.zone_size_m.value, 25.0);
        assert_eq!(config.zone_size_m.source, ConfigSource::File);
        assert_eq!(config.image_dir.value, PathBuf::from("/var/cache/parcelgeo"));
        assert_eq!(config.query_timeout_secs.value, 5);
        assert_eq!(config.image_timeout_secs.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_rejects_negative_zone() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "zone_size_m = -4.0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(ParcelError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            zone_size_m: Some(100.0),
            image_dir: None,
            query_timeout_secs: Some(2),
        });

        assert_eq!(config.zone_size_m.value, 100.0);
        assert_eq!(config.zone_size_m.source, ConfigSource::Cli);
        assert_eq!(config.query_timeout(), Duration::from_secs(2));
        assert_eq!(config.image_dir.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_zone_size() {
        assert_eq!(parse_zone_size(10.0).unwrap(), 10.0);
        assert!(parse_zone_size(0.0).is_err());
        assert!(parse_zone_size(f64::NAN).is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        let (zone, source) = &map["zone_size_m"];
        assert_eq!(zone, "10");
        assert_eq!(*source, ConfigSource::Default);
        assert!(map.contains_key("image_dir"));
        assert!(map.contains_key("image_timeout_secs"));
    }
}
