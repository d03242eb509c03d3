//! Audio extraction using FFmpeg

use crate::error::TranscodeError;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Compressed audio container written by the transcoder.
pub const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug)]
pub struct Transcoder {
    ffmpeg_path: PathBuf,
}

impl Transcoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Extract the audio track of `video` into an MP3 named after the video's
    /// base name.
    ///
    /// With an output directory the file lands there (the directory is created
    /// if absent); otherwise it is written alongside the source video. Re-runs
    /// overwrite the previous output rather than accumulating files.
    pub async fn extract_audio(
        &self,
        video: &Path,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf, TranscodeError> {
        if !video.exists() {
            return Err(TranscodeError::InputNotFound(video.display().to_string()));
        }

        let audio_path = audio_output_path(video, output_dir)?;

        if let Some(dir) = output_dir {
            tokio::fs::create_dir_all(dir).await?;
        }

        info!("Extracting audio from: {}", video.display());

        let status = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-i")
            .arg(video)
            // Audio stream only, LAME VBR ~190 kbps
            .args(["-vn", "-c:a", "libmp3lame", "-q:a", "2"])
            .arg("-y")
            .arg(&audio_path)
            .status()
            .await?;

        if !status.success() {
            return Err(TranscodeError::FfmpegFailed(status.code()));
        }

        debug!("Wrote audio to: {}", audio_path.display());
        Ok(audio_path)
    }
}

/// Derive the audio output path for a video file: same base name, MP3
/// extension, placed in `output_dir` when given or next to the video.
pub fn audio_output_path(
    video: &Path,
    output_dir: Option<&Path>,
) -> Result<PathBuf, TranscodeError> {
    let stem = video
        .file_stem()
        .ok_or_else(|| TranscodeError::BadInputPath(video.display().to_string()))?;

    let file_name = PathBuf::from(stem).with_extension(AUDIO_EXTENSION);

    Ok(match output_dir {
        Some(dir) => dir.join(file_name),
        None => video.with_extension(AUDIO_EXTENSION),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_path_alongside_video() {
        let path = audio_output_path(Path::new("/tmp/input.mp4"), None).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/input.mp3"));
    }

    #[test]
    fn test_audio_path_in_output_dir() {
        let path =
            audio_output_path(Path::new("/videos/My Clip.mp4"), Some(Path::new("/out"))).unwrap();
        assert_eq!(path, PathBuf::from("/out/My Clip.mp3"));
    }

    #[test]
    fn test_audio_path_shares_base_name() {
        let video = Path::new("/a/b/some title here.mp4");
        let audio = audio_output_path(video, None).unwrap();
        assert_eq!(audio.file_stem(), video.file_stem());
    }

    #[test]
    fn test_audio_path_is_stable() {
        let video = Path::new("/tmp/x.mp4");
        let first = audio_output_path(video, Some(Path::new("/out"))).unwrap();
        let second = audio_output_path(video, Some(Path::new("/out"))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_audio_path_rejects_pathless_input() {
        assert!(audio_output_path(Path::new("/"), None).is_err());
    }

    #[tokio::test]
    async fn test_missing_input_fails_without_spawning_ffmpeg() {
        // Deliberately bogus ffmpeg path: the existence check must fire first.
        let transcoder = Transcoder::new(PathBuf::from("/nonexistent/ffmpeg"));
        let err = transcoder
            .extract_audio(Path::new("/no/such/video.mp4"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::InputNotFound(_)));
    }
}
