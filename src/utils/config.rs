use crate::core::{Coordinate, GeoValueError, GeofenceSpec};
use crate::map::MapOptions;
use crate::platform::PositionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Check-in geofence as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceConfig {
    /// Center latitude in decimal degrees
    pub latitude: f64,
    /// Center longitude in decimal degrees
    pub longitude: f64,
    /// Allowed check-in radius (meters)
    pub radius_m: f64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            latitude: 24.998527,
            longitude: 121.457033,
            radius_m: 100.0,
        }
    }
}

/// Application configuration, supplied once at startup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub geofence: GeofenceConfig,
    /// Options passed to the geolocation platform
    pub tracker: PositionOptions,
    pub map: MapOptions,
    /// JSON file receiving check-in records; in-memory when unset
    pub store_path: Option<String>,
}

impl AppConfig {
    /// Validated geofence
    pub fn geofence_spec(&self) -> Result<GeofenceSpec, ConfigError> {
        let center = Coordinate::new(self.geofence.latitude, self.geofence.longitude)?;
        Ok(GeofenceSpec::new(center, self.geofence.radius_m)?)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("invalid geofence: {0}")]
    Geofence(#[from] GeoValueError),
    #[error("failed to access config file '{path}'")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config")]
    Serialization(#[from] serde_json::Error),
    #[error("no file path set for saving configuration")]
    NoPath,
}

/// Outcome of validating a configuration
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

/// Loads, validates and saves the application configuration
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: AppConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: AppConfig) -> Result<(), ConfigError> {
        Self::into_error(Self::validate_config(&config))?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Move the geofence; returns the validated spec
    pub fn set_geofence(&mut self, latitude: f64, longitude: f64, radius_m: f64) -> Result<GeofenceSpec, ConfigError> {
        let geofence = GeofenceConfig { latitude, longitude, radius_m };
        let mut config = self.config.clone();
        config.geofence = geofence;
        let spec = config.geofence_spec()?;
        self.update_config(config)?;
        Ok(spec)
    }

    pub fn set_position_options(&mut self, options: PositionOptions) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.tracker = options;
        self.update_config(config)
    }

    pub fn set_map_options(&mut self, options: MapOptions) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.map = options;
        self.update_config(config)
    }

    /// Load configuration from a JSON file. Missing sections take defaults.
    /// The current configuration is left untouched on failure
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;

        let validation = Self::validate_config(&config);
        for warning in &validation.warnings {
            warn!(path = %path_str, "{}", warning);
        }
        Self::into_error(validation)?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        info!(path = ?self.config_file_path, "configuration loaded");
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = serde_json::to_string_pretty(&self.config)?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::NoPath),
        }
    }

    /// Check if configuration has been modified since last load or save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn validate_config(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        if let Err(error) = config.geofence_spec() {
            result.errors.push(error);
        } else if config.geofence.radius_m < 20.0 {
            result
                .warnings
                .push("geofence radius is below typical GPS accuracy".to_string());
        }

        if config.tracker.timeout_ms == 0 {
            result.errors.push(ConfigError::InvalidParameter {
                parameter: "tracker.timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !config.tracker.high_accuracy {
            result
                .warnings
                .push("high accuracy disabled; fixes may be too coarse for the geofence".to_string());
        }

        if !(0.0..=22.0).contains(&config.map.default_zoom) {
            result.errors.push(ConfigError::InvalidParameter {
                parameter: "map.default_zoom".to_string(),
                value: config.map.default_zoom.to_string(),
                reason: "must be within 0..=22".to_string(),
            });
        }
        if !config.map.fit_padding_factor.is_finite() || config.map.fit_padding_factor < 0.0 {
            result.errors.push(ConfigError::InvalidParameter {
                parameter: "map.fit_padding_factor".to_string(),
                value: config.map.fit_padding_factor.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        if config.map.settle_delay_ms > 2_000 {
            result
                .warnings
                .push("settle delay above 2 s makes the viewport feel unresponsive".to_string());
        }

        result.is_valid = result.errors.is_empty();
        result
    }

    fn into_error(validation: ValidationResult) -> Result<(), ConfigError> {
        match validation.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::process;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("geocheckin-config-{}-{}.json", process::id(), name))
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        let fence = config.geofence_spec().unwrap();
        assert_eq!(fence.center().latitude(), 24.998527);
        assert_eq!(fence.center().longitude(), 121.457033);
        assert_eq!(fence.radius_m(), 100.0);
        assert!(config.tracker.high_accuracy);
        assert_eq!(config.tracker.timeout_ms, 10_000);
        assert_eq!(config.map.settle_delay_ms, 300);

        let validation = ConfigurationManager::validate_config(&config);
        assert!(validation.is_valid);
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.geofence.radius_m = 0.0;
        config.tracker.timeout_ms = 0;
        config.map.default_zoom = 30.0;
        config.map.fit_padding_factor = -1.0;

        let validation = ConfigurationManager::validate_config(&config);
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 4);
    }

    #[test]
    fn test_set_geofence() {
        let mut manager = ConfigurationManager::new();
        assert!(!manager.is_modified());

        let spec = manager.set_geofence(25.0, 121.5, 50.0).unwrap();
        assert_eq!(spec.radius_m(), 50.0);
        assert!(manager.is_modified());

        let err = manager.set_geofence(95.0, 121.5, 50.0).unwrap_err();
        assert!(matches!(err, ConfigError::Geofence(GeoValueError::LatitudeOutOfRange(_))));
        // Rejected update leaves the previous fence in place
        assert_eq!(manager.get_config().geofence.latitude, 25.0);
    }

    #[test]
    fn test_set_tracker_and_map_options() {
        let mut manager = ConfigurationManager::new();
        let options = PositionOptions {
            high_accuracy: false,
            max_cached_age_ms: 60_000,
            timeout_ms: 30_000,
        };
        manager.set_position_options(options.clone()).unwrap();
        assert_eq!(manager.get_config().tracker, options);
        assert!(manager.is_modified());

        let zero_timeout = PositionOptions {
            timeout_ms: 0,
            ..PositionOptions::default()
        };
        assert!(matches!(
            manager.set_position_options(zero_timeout),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert_eq!(manager.get_config().tracker, options);

        let map = MapOptions {
            fit_padding_factor: 0.0,
            ..MapOptions::default()
        };
        manager.set_map_options(map.clone()).unwrap();
        assert_eq!(manager.get_config().map, map);

        let bad_zoom = MapOptions {
            default_zoom: 30.0,
            ..MapOptions::default()
        };
        assert!(manager.set_map_options(bad_zoom).is_err());
        assert_eq!(manager.get_config().map, map);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save-load");
        let mut manager = ConfigurationManager::new();
        manager.set_geofence(25.0, 121.5, 150.0).unwrap();
        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.get_config(), manager.get_config());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "geofence": { "latitude": 10.0, "longitude": 20.0, "radius_m": 75.0 } }"#).unwrap();

        let manager = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(manager.get_config().geofence.radius_m, 75.0);
        assert_eq!(manager.get_config().map, MapOptions::default());
        assert_eq!(manager.get_config().store_path, None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_file_keeps_current_config() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "geofence": { "latitude": 10.0, "longitude": 20.0, "radius_m": -1.0 } }"#).unwrap();

        let mut manager = ConfigurationManager::new();
        assert!(manager.load_from_file(&path).is_err());
        assert_eq!(manager.get_config(), &AppConfig::default());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::NoPath)));
    }
}
