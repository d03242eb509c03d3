//! Pipeline orchestration: download, transcode, upload

use crate::config::{ApiCredentials, Config};
use crate::downloader::{Downloader, VideoAsset};
use crate::error::IngestError;
use crate::transcoder::Transcoder;
use crate::uploader::{UploadOutcome, Uploader};

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Where the job's video comes from.
#[derive(Debug, Clone)]
pub enum JobSource {
    /// A video-hosting URL to download first.
    Remote { url: String },
    /// An existing local video file; the downloader is skipped and the title
    /// derives from the file stem.
    Local { path: PathBuf },
}

/// Pipeline configuration for a single job
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source: JobSource,
    /// Directory for the produced files; a fresh per-job temp directory when
    /// not set (remote mode) or alongside the source video (local mode).
    pub output_dir: Option<PathBuf>,
    /// Keep intermediate files instead of cleaning up the temp directory
    pub keep_temp: bool,
    pub config: Config,
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Downloading { title: String },
    Transcoding,
    Uploading,
    Complete { audio: PathBuf, duration: Duration },
    Failed { stage: String, error: String },
}

/// What a completed job produced.
#[derive(Debug)]
pub struct JobOutput {
    pub title: String,
    /// Downloaded video path; `None` in local-file mode (the caller's file is
    /// left where it was).
    pub video_path: Option<PathBuf>,
    pub audio_path: PathBuf,
    pub upload: UploadOutcome,
}

/// Main processing pipeline.
///
/// Runs exactly one job; any stage failure aborts before the next stage is
/// invoked, with no retry and no partial recovery. A transcoded audio file is
/// never deleted on upload failure.
pub struct Pipeline {
    config: PipelineConfig,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, progress_tx: mpsc::Sender<PipelineStage>) -> Self {
        Self {
            config,
            progress_tx,
        }
    }

    pub async fn run(&self) -> Result<JobOutput, IngestError> {
        let start_time = Instant::now();
        let app_config = &self.config.config;

        // Credentials are required before any stage runs
        let credentials = app_config.api_credentials().map_err(|e| {
            let _ = self.progress_tx.try_send(PipelineStage::Failed {
                stage: "config".to_string(),
                error: e.to_string(),
            });
            e
        })?;

        let ffmpeg_path = app_config.ffmpeg_path()?;

        // Per-job working directory, cleaned up on drop. On failure it is
        // deliberately leaked so that already-produced artifacts (a transcoded
        // audio file whose upload was rejected, say) stay on disk.
        let temp_dir = tempfile::tempdir_in(app_config.temp_dir())?;

        let outcome = self
            .run_stages(credentials, ffmpeg_path, temp_dir.path().to_path_buf(), start_time)
            .await;

        match &outcome {
            Ok(_) if self.config.keep_temp || !app_config.temp.cleanup => {
                debug!("Temp files kept at: {}", temp_dir.path().display());
                std::mem::forget(temp_dir);
            }
            Ok(_) => {}
            Err(_) => {
                debug!("Leaving job files at: {}", temp_dir.path().display());
                std::mem::forget(temp_dir);
            }
        }

        outcome
    }

    async fn run_stages(
        &self,
        credentials: ApiCredentials,
        ffmpeg_path: PathBuf,
        temp_path: PathBuf,
        start_time: Instant,
    ) -> Result<JobOutput, IngestError> {
        let app_config = &self.config.config;

        let (downloaded, source_video, title, work_dir) = match &self.config.source {
            JobSource::Remote { url } => {
                info!("Starting remote job for: {}", url);

                let work_dir = self
                    .config
                    .output_dir
                    .clone()
                    .unwrap_or_else(|| temp_path.clone());
                tokio::fs::create_dir_all(&work_dir).await?;

                let _ = self
                    .progress_tx
                    .send(PipelineStage::Downloading {
                        title: "Fetching video info...".to_string(),
                    })
                    .await;

                let yt_dlp_path = app_config.yt_dlp_path()?;
                let downloader = Downloader::new(yt_dlp_path, work_dir.clone());
                let VideoAsset { path, title } =
                    downloader.download(url).await.map_err(|e| {
                        let _ = self.progress_tx.try_send(PipelineStage::Failed {
                            stage: "download".to_string(),
                            error: e.to_string(),
                        });
                        e
                    })?;

                let _ = self
                    .progress_tx
                    .send(PipelineStage::Downloading {
                        title: title.clone(),
                    })
                    .await;

                (Some(path.clone()), path, title, Some(work_dir))
            }
            JobSource::Local { path } => {
                info!("Starting local job for: {}", path.display());

                if !path.exists() {
                    let e = IngestError::Pipeline(format!("file not found: {}", path.display()));
                    let _ = self.progress_tx.try_send(PipelineStage::Failed {
                        stage: "input".to_string(),
                        error: e.to_string(),
                    });
                    return Err(e);
                }

                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "No Title".to_string());

                (None, path.clone(), title, self.config.output_dir.clone())
            }
        };

        // Transcode
        let _ = self.progress_tx.send(PipelineStage::Transcoding).await;

        let transcoder = Transcoder::new(ffmpeg_path);
        let audio_path = transcoder
            .extract_audio(&source_video, work_dir.as_deref())
            .await
            .map_err(|e| {
                let _ = self.progress_tx.try_send(PipelineStage::Failed {
                    stage: "transcode".to_string(),
                    error: e.to_string(),
                });
                e
            })?;

        // Upload
        let _ = self.progress_tx.send(PipelineStage::Uploading).await;

        let uploader = Uploader::new(credentials, app_config.upload.clone());
        let upload = uploader.upload(&audio_path).await.map_err(|e| {
            let _ = self.progress_tx.try_send(PipelineStage::Failed {
                stage: "upload".to_string(),
                error: e.to_string(),
            });
            e
        })?;

        let duration = start_time.elapsed();
        info!(
            "Job complete: {} ({:.1}s)",
            audio_path.display(),
            duration.as_secs_f32()
        );

        let _ = self
            .progress_tx
            .send(PipelineStage::Complete {
                audio: audio_path.clone(),
                duration,
            })
            .await;

        Ok(JobOutput {
            title,
            video_path: downloaded,
            audio_path,
            upload,
        })
    }
}
