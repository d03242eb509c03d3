//! Video downloader using yt-dlp

use crate::error::DownloadError;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// yt-dlp format 18: 360p MP4, widely compatible
const VIDEO_FORMAT: &str = "18";

#[derive(Debug)]
pub struct Downloader {
    yt_dlp_path: PathBuf,
    output_dir: PathBuf,
}

/// A downloaded video file plus its display title.
#[derive(Debug, Clone)]
pub struct VideoAsset {
    pub path: PathBuf,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
struct VideoInfo {
    #[serde(default = "default_title")]
    title: String,
}

fn default_title() -> String {
    "No Title".to_string()
}

impl Downloader {
    pub fn new(yt_dlp_path: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            yt_dlp_path,
            output_dir,
        }
    }

    /// Download the video behind `url` into the configured directory.
    ///
    /// The file is named after the sanitized video title with an `.mp4`
    /// extension. Fails if metadata extraction or the download itself fails;
    /// a partial file left behind by yt-dlp is not treated as a result.
    pub async fn download(&self, url: &str) -> Result<VideoAsset, DownloadError> {
        let title = self.probe_title(url).await?;
        let safe_title = sanitize_title(&title);

        info!("Downloading: {}", title);

        let video_path = self.output_dir.join(format!("{}.mp4", safe_title));

        let output = Command::new(&self.yt_dlp_path)
            .args(["-f", VIDEO_FORMAT])
            .arg("-o")
            .arg(&video_path)
            .args(["--quiet", "--no-warnings", "--no-playlist", url])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(map_yt_dlp_failure(url, &stderr, output.status.code()));
        }

        if !video_path.exists() {
            return Err(DownloadError::MissingOutput(
                video_path.display().to_string(),
            ));
        }

        debug!("Saved video to: {}", video_path.display());

        Ok(VideoAsset {
            path: video_path,
            title,
        })
    }

    /// Fetch the video's display title without downloading anything.
    pub async fn probe_title(&self, url: &str) -> Result<String, DownloadError> {
        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-download", "--no-warnings", url])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(map_yt_dlp_failure(url, &stderr, output.status.code()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info: VideoInfo = serde_json::from_str(&stdout)
            .map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

        Ok(info.title)
    }
}

fn map_yt_dlp_failure(url: &str, stderr: &str, code: Option<i32>) -> DownloadError {
    if stderr.contains("Video unavailable") || stderr.contains("Private video") {
        return DownloadError::VideoUnavailable(url.to_string());
    }
    if stderr.contains("is not a valid URL") || stderr.contains("Unsupported URL") {
        return DownloadError::InvalidUrl(url.to_string());
    }
    DownloadError::YtDlpFailed(code)
}

/// Sanitize a video title for use as a file name.
///
/// Keeps alphanumerics, spaces, underscores and hyphens; everything else is
/// stripped, and surrounding whitespace is trimmed.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}
