//! Multipart upload to the knowledge-base ingestion API

use crate::config::{ApiCredentials, UploadConfig};
use crate::error::UploadError;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::path::Path;
use tracing::{debug, info, warn};

/// The ingestion API caps entry names at 100 characters.
pub const MAX_NAME_LEN: usize = 100;

const AUDIO_MIME: &str = "audio/mpeg";

#[derive(Debug)]
pub struct Uploader {
    client: reqwest::Client,
    credentials: ApiCredentials,
    upload: UploadConfig,
}

/// Outcome of a completed (accepted) upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub status: u16,
    pub body: String,
}

impl Uploader {
    pub fn new(credentials: ApiCredentials, upload: UploadConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            upload,
        }
    }

    /// POST the audio file to the configured ingestion endpoint.
    ///
    /// The file is read into memory up front, so no handle stays open for the
    /// duration of the request. Non-2xx responses become
    /// [`UploadError::Rejected`] with the response body attached.
    pub async fn upload(&self, audio: &Path) -> Result<UploadOutcome, UploadError> {
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::BadFileName(audio.display().to_string()))?
            .to_string();
        let entry_name = truncate_name(&file_name, MAX_NAME_LEN);

        let bytes = tokio::fs::read(audio).await?;

        let settings = json!({
            "appVisibility": self.upload.visibility,
            "autoSummary": self.upload.auto_summary,
        })
        .to_string();

        let file_part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(AUDIO_MIME)?;

        let form = Form::new()
            .text("name", entry_name.clone())
            .part("file", file_part)
            .text("settings", settings)
            .text("tags", self.upload.tags.clone());

        info!("Uploading {} to {}", entry_name, self.credentials.endpoint);

        let response = self
            .client
            .post(&self.credentials.endpoint)
            .header("X-API-Key", &self.credentials.key)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!("Status code: {}", status);
        debug!("Response body: {}", body);

        if !status.is_success() {
            warn!("Upload rejected with HTTP {}: {}", status, body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Upload accepted ({})", status.as_u16());
        Ok(UploadOutcome {
            status: status.as_u16(),
            body,
        })
    }
}

/// Truncate a file name to at most `max_len` characters, preserving the
/// extension.
///
/// Characters come off the stem, with the split point recomputed as
/// `max_len - len(extension)`. An extension longer than `max_len` on its own
/// is left untouched (the remote API's behavior there is unspecified).
pub fn truncate_name(file_name: &str, max_len: usize) -> String {
    if file_name.chars().count() <= max_len {
        return file_name.to_string();
    }

    let (stem, ext) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    };

    let keep = max_len.saturating_sub(ext.chars().count());
    let truncated: String = stem.chars().take(keep).collect();
    format!("{}{}", truncated, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_truncate_name_short_names_untouched() {
        assert_eq!(truncate_name("clip.mp3", 100), "clip.mp3");
        assert_eq!(truncate_name("exactly", 7), "exactly");
    }

    #[test]
    fn test_truncate_name_preserves_extension() {
        let long = format!("{}.mp3", "x".repeat(120));
        let truncated = truncate_name(&long, 100);
        assert_eq!(truncated.chars().count(), 100);
        assert!(truncated.ends_with(".mp3"));
        assert_eq!(truncated, format!("{}.mp3", "x".repeat(96)));
    }

    #[test]
    fn test_truncate_name_without_extension() {
        let long = "y".repeat(150);
        let truncated = truncate_name(&long, 100);
        assert_eq!(truncated, "y".repeat(100));
    }

    #[test]
    fn test_truncate_name_multibyte() {
        let long = format!("{}.mp3", "ü".repeat(120));
        let truncated = truncate_name(&long, 100);
        assert_eq!(truncated.chars().count(), 100);
        assert!(truncated.ends_with(".mp3"));
    }

    fn test_uploader(endpoint: String) -> Uploader {
        Uploader::new(
            ApiCredentials {
                endpoint,
                key: "test-key".to_string(),
            },
            UploadConfig {
                tags: "video_converter_app".to_string(),
                visibility: "visible".to_string(),
                auto_summary: true,
            },
        )
    }

    /// Minimal one-shot HTTP responder: reads the full request, replies with
    /// the given status line and body, and hands the captured request back.
    async fn spawn_responder(
        status_line: &'static str,
        body: &'static str,
    ) -> (SocketAddr, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 8192];

            let header_end = loop {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers arrived");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse().unwrap())
                .unwrap_or(0);

            while request.len() - header_end < content_length {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed mid-body");
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();

            request
        });

        (addr, handle)
    }

    #[tokio::test]
    async fn test_upload_success_sends_expected_form() {
        let (addr, server) = spawn_responder("200 OK", r#"{"id":"kb-1"}"#).await;

        let dir = tempfile::tempdir().unwrap();
        let long_stem = "a".repeat(120);
        let audio = dir.path().join(format!("{}.mp3", long_stem));
        std::fs::write(&audio, b"ID3 fake audio bytes").unwrap();

        let uploader = test_uploader(format!("http://{}/ingest", addr));
        let outcome = uploader.upload(&audio).await.unwrap();
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.body, r#"{"id":"kb-1"}"#);

        let request = server.await.unwrap();
        let text = String::from_utf8_lossy(&request);

        assert!(text.contains("x-api-key: test-key") || text.contains("X-API-Key: test-key"));
        // Entry name truncated to 100 chars with the extension kept; match the
        // whole form field so the untruncated file name cannot satisfy this.
        let name_field = format!("name=\"name\"\r\n\r\n{}.mp3\r\n", "a".repeat(96));
        assert!(text.contains(&name_field));
        assert!(text.contains("video_converter_app"));
        assert!(text.contains(r#""appVisibility":"visible""#));
        assert!(text.contains(r#""autoSummary":true"#));
        assert!(text.contains("audio/mpeg"));
        assert!(text.contains("ID3 fake audio bytes"));
    }

    #[tokio::test]
    async fn test_upload_server_error_is_rejected_and_file_survives() {
        let (addr, server) = spawn_responder("500 Internal Server Error", "boom").await;

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.mp3");
        std::fs::write(&audio, b"audio").unwrap();

        let uploader = test_uploader(format!("http://{}/ingest", addr));
        let err = uploader.upload(&audio).await.unwrap_err();
        match err {
            UploadError::Rejected { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Rejected, got: {:?}", other),
        }
        server.await.unwrap();

        // This core never deletes the transcoder's output, and the handle is
        // closed: the file can still be opened and removed.
        assert!(audio.exists());
        std::fs::OpenOptions::new()
            .write(true)
            .open(&audio)
            .unwrap();
        std::fs::remove_file(&audio).unwrap();
    }

    #[tokio::test]
    async fn test_upload_network_failure_surfaces_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.mp3");
        std::fs::write(&audio, b"audio").unwrap();

        let uploader = test_uploader(format!("http://{}/ingest", addr));
        let err = uploader.upload(&audio).await.unwrap_err();
        assert!(matches!(err, UploadError::Request(_)));
        assert!(audio.exists());
    }
}
