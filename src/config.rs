//! Configuration file support for geoscribe.
//!
//! Settings are stored as versioned JSON: in the user config directory on
//! native builds and in `localStorage` in the browser. Missing fields fall
//! back to defaults so older files keep loading.

use serde::{Deserialize, Serialize};

use crate::constants::{self, camera, geocoder};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Base URL of the feature persistence API (without `/api/features`)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Geocoder settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Initial map view
    #[serde(default)]
    pub initial_view: InitialView,

    /// Camera animation settings
    #[serde(default)]
    pub camera: CameraConfig,

    /// File name offered for GeoJSON export
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_export_file_name() -> String {
    constants::EXPORT_FILE_NAME.to_string()
}

/// Geocoding search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Search endpoint URL
    pub endpoint: String,
    /// Comma-separated ISO country codes restricting results (empty for none)
    #[serde(default)]
    pub country_codes: String,
    /// Maximum number of results kept
    pub limit: usize,
    /// Minimum query length in characters
    pub min_query_len: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: geocoder::ENDPOINT.to_string(),
            country_codes: geocoder::COUNTRY_CODES.to_string(),
            limit: geocoder::RESULT_LIMIT,
            min_query_len: geocoder::MIN_QUERY_LEN,
        }
    }
}

/// Map view shown at start-up, in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialView {
    pub lon: f64,
    pub lat: f64,
    pub zoom: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            lon: constants::INITIAL_LON,
            lat: constants::INITIAL_LAT,
            zoom: constants::INITIAL_ZOOM,
        }
    }
}

/// Camera framing and animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Padding in pixels on every side when framing a feature
    pub fit_padding_px: f64,
    /// Zoom ceiling when framing a feature
    pub fit_max_zoom: f64,
    /// Framing animation duration
    pub fit_duration_ms: u32,
    /// Zoom used when jumping to a geocoded location
    pub go_to_zoom: f64,
    /// Jump animation duration
    pub go_to_duration_ms: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fit_padding_px: camera::FIT_PADDING_PX,
            fit_max_zoom: camera::FIT_MAX_ZOOM,
            fit_duration_ms: camera::FIT_DURATION_MS,
            go_to_zoom: camera::GO_TO_ZOOM,
            go_to_duration_ms: camera::GO_TO_DURATION_MS,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_base_url: default_api_base_url(),
            geocoder: GeocoderConfig::default(),
            initial_view: InitialView::default(),
            camera: CameraConfig::default(),
            export_file_name: default_export_file_name(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "geoscribe-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("geoscribe").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("geoscribe")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Try to load configuration from `path`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to `path`, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "geoscribe-config";

    /// Try to load configuration from localStorage (WASM only).
    /// Returns None if not found or can't be parsed.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }

    /// Load the stored configuration for this platform, or defaults.
    pub fn load_or_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let loaded = Self::load_from_default_path();
        #[cfg(target_arch = "wasm32")]
        let loaded = Self::load_from_local_storage();

        loaded.unwrap_or_default()
    }

    /// URL of the feature collection endpoint.
    pub fn features_url(&self) -> String {
        format!("{}/api/features", self.api_base_url.trim_end_matches('/'))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}
