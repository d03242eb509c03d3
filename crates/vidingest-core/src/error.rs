//! Error types for vidingest-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Transcode failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Failed to parse video metadata: {0}")]
    MetadataParse(String),

    #[error("Download produced no file at {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Input video not found: {0}")]
    InputNotFound(String),

    #[error("FFmpeg failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error("Cannot derive audio path from: {0}")]
    BadInputPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upload rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Audio file has no usable file name: {0}")]
    BadFileName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("API key not configured (set VIDINGEST_API__KEY or [api] key in config.toml)")]
    MissingApiKey,

    #[error("API endpoint not configured (set VIDINGEST_API__ENDPOINT or [api] endpoint in config.toml)")]
    MissingEndpoint,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
