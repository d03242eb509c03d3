//! vidingest-core: download a video, extract its audio, upload it to a
//! knowledge-base ingestion API

pub mod config;
pub mod downloader;
pub mod error;
pub mod pipeline;
pub mod transcoder;
pub mod uploader;

pub use config::Config;
pub use error::{IngestError, Result};
