//! Configuration management for vidingest

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub upload: UploadConfig,
    pub temp: TempConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Ingestion endpoint URL (required before any job runs)
    pub endpoint: Option<String>,
    /// Static API key forwarded as X-API-Key (required before any job runs)
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output directory for kept artifacts
    pub default_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Tag the ingestion API uses to identify the submitting application
    pub tags: String,
    /// Knowledge-base visibility for uploaded entries
    pub visibility: String,
    /// Ask the knowledge base to auto-summarize the entry
    pub auto_summary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempConfig {
    /// Clean up temp files after processing
    pub cleanup: bool,
    /// Custom temp directory (uses system temp if not set)
    pub directory: Option<PathBuf>,
}

/// Resolved, required API credentials.
///
/// Obtained through [`Config::api_credentials`] so that a missing key or
/// endpoint fails before any pipeline stage runs.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub endpoint: String,
    pub key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                endpoint: None,
                key: None,
            },
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
            },
            output: OutputConfig {
                default_directory: PathBuf::from("."),
            },
            upload: UploadConfig {
                tags: "video_converter_app".to_string(),
                visibility: "visible".to_string(),
                auto_summary: true,
            },
            temp: TempConfig {
                cleanup: true,
                directory: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("vidingest/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment (VIDINGEST_API__KEY, VIDINGEST_PATHS__YT_DLP,
        // ...). Sections split on a double underscore so that field names
        // containing `_` stay addressable.
        figment = figment.merge(Env::prefixed("VIDINGEST_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Resolve the API credentials, failing if either half is absent.
    pub fn api_credentials(&self) -> Result<ApiCredentials, ConfigError> {
        let endpoint = self
            .api
            .endpoint
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let key = self
            .api
            .key
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(ApiCredentials {
            endpoint: endpoint.to_string(),
            key: key.to_string(),
        })
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }

    /// Get temp directory
    pub fn temp_dir(&self) -> PathBuf {
        self.temp
            .directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
