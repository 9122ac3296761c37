use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{DownloadAck, ProgressSnapshot, TrackDescriptor};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("execution service answered http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("could not decode response: {0}")]
    InvalidResponse(String),
}

/// The execution-service surface the session core depends on. Tests
/// substitute this seam for the real HTTP collaborator.
#[async_trait]
pub trait ExecutionApi: Send + Sync {
    /// Resolve a playlist reference into its ordered track listing.
    async fn convert_playlist(&self, playlist_url: &str)
        -> Result<Vec<TrackDescriptor>, ApiError>;

    /// Submit the selected tracks for processing under `session_id`.
    async fn start_download(
        &self,
        playlist_url: &str,
        tracks: &[TrackDescriptor],
        session_id: &str,
    ) -> Result<DownloadAck, ApiError>;

    /// Query the current progress picture for a session.
    async fn fetch_progress(&self, session_id: &str) -> Result<ProgressSnapshot, ApiError>;

    /// Best-effort stop signal for a session.
    async fn cancel_session(&self, session_id: &str) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct ConvertRequest<'a> {
    playlist_url: &'a str,
}

#[derive(Serialize)]
struct DownloadRequest<'a> {
    playlist_url: &'a str,
    selected_tracks: &'a [TrackDescriptor],
    session_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpExecutionClient {
    settings: ClientSettings,
    http: reqwest::Client,
}

impl HttpExecutionClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { settings, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ExecutionApi for HttpExecutionClient {
    async fn convert_playlist(
        &self,
        playlist_url: &str,
    ) -> Result<Vec<TrackDescriptor>, ApiError> {
        let response = self
            .http
            .post(self.endpoint("convert"))
            .json(&ConvertRequest { playlist_url })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        response
            .json::<Vec<TrackDescriptor>>()
            .await
            .map_err(map_reqwest_error)
    }

    async fn start_download(
        &self,
        playlist_url: &str,
        tracks: &[TrackDescriptor],
        session_id: &str,
    ) -> Result<DownloadAck, ApiError> {
        let response = self
            .http
            .post(self.endpoint("download"))
            .json(&DownloadRequest {
                playlist_url,
                selected_tracks: tracks,
                session_id,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        response
            .json::<DownloadAck>()
            .await
            .map_err(map_reqwest_error)
    }

    async fn fetch_progress(&self, session_id: &str) -> Result<ProgressSnapshot, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("progress/{session_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        response
            .json::<ProgressSnapshot>()
            .await
            .map_err(map_reqwest_error)
    }

    async fn cancel_session(&self, session_id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint(&format!("cancel/{session_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        Ok(())
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::HttpStatus(status.as_u16()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    if err.is_decode() {
        return ApiError::InvalidResponse(err.to_string());
    }
    ApiError::Network(err.to_string())
}
