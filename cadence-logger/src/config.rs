use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

/// Recorder configuration, read from a TOML file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub source: SourceConfig,
    pub measurement: MeasurementConfig,
    pub storage: StorageConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Phone running the Phyphox app with remote access enabled
    Phyphox,
    /// Replay of the bundled recording
    Mock,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phyphox" => Ok(SourceKind::Phyphox),
            "mock" => Ok(SourceKind::Mock),
            other => Err(format!("Unknown source {}, expected phyphox or mock", other)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Phyphox => write!(f, "phyphox"),
            SourceKind::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub base_url: String,
    pub tag: String,
    pub update_period_millis: u64,
    /// Mock only
    pub capture_sampling_period_millis: f64,
    /// Mock only
    pub add_sensor_noise: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    pub start_delay_secs: u64,
    pub sampling_interval_millis: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub documents_dir: PathBuf,
    pub downloads_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub open_after_save: bool,
    /// Program launched with the exported file. Empty disables the viewer.
    pub program: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Phyphox,
            base_url: "http://192.168.1.34".to_string(),
            tag: "Phone".to_string(),
            update_period_millis: 100,
            capture_sampling_period_millis: 10.0,
            add_sensor_noise: false,
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            start_delay_secs: 5,
            sampling_interval_millis: 20,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("data/documents"),
            downloads_dir: PathBuf::from("data/downloads"),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            open_after_save: true,
            program: "xdg-open".to_string(),
        }
    }
}

impl MeasurementConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_secs(self.start_delay_secs)
    }

    pub fn sampling_interval(&self) -> Duration {
        Duration::from_millis(self.sampling_interval_millis)
    }
}

impl LoggerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: LoggerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.update_period_millis == 0 {
            return Err(ConfigError::Validation(
                "Update period must be positive".to_string(),
            ));
        }
        if self.source.kind == SourceKind::Phyphox && self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Base url of the phyphox source is empty".to_string(),
            ));
        }
        if self.source.kind == SourceKind::Mock
            && !(self.source.capture_sampling_period_millis.is_finite()
                && self.source.capture_sampling_period_millis > 0.0)
        {
            return Err(ConfigError::Validation(
                "Capture sampling period must be positive".to_string(),
            ));
        }
        if self.measurement.sampling_interval_millis == 0 {
            return Err(ConfigError::Validation(
                "Sampling interval must be positive".to_string(),
            ));
        }
        if self.storage.documents_dir.as_os_str().is_empty()
            || self.storage.downloads_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "Storage directories must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
