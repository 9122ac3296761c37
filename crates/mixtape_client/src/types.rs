use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One playlist entry as the execution service describes it. `query` is
/// the search string the service resolves the track with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
    pub query: String,
}

impl TrackDescriptor {
    pub fn into_core(self) -> mixtape_core::TrackInfo {
        mixtape_core::TrackInfo {
            id: self.id,
            title: self.title,
            artist: self.artist,
        }
    }

    pub fn from_core(track: &mixtape_core::TrackInfo) -> Self {
        Self {
            id: track.id.clone(),
            query: track.label(),
            title: track.title.clone(),
            artist: track.artist.clone(),
        }
    }
}

/// Acknowledgement returned by a download request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadAck {
    pub status: String,
    pub session_id: String,
}

/// Wire form of one progress poll response. Counters default to zero so
/// a sparse payload still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub completed_tracks: u32,
    #[serde(default)]
    pub current_track: String,
    #[serde(default)]
    pub track_progress: BTreeMap<String, TrackProgress>,
    pub status: SnapshotStatus,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ProgressSnapshot {
    pub fn into_core(self) -> mixtape_core::ProgressSnapshot {
        mixtape_core::ProgressSnapshot {
            total_tracks: self.total_tracks,
            completed_tracks: self.completed_tracks,
            current_track: self.current_track,
            tracks: self
                .track_progress
                .into_iter()
                .map(|(key, progress)| (key, progress.into_core()))
                .collect(),
            status: match self.status {
                SnapshotStatus::InProgress => mixtape_core::SnapshotStatus::InProgress,
                SnapshotStatus::Completed => mixtape_core::SnapshotStatus::Completed,
            },
            download_url: self.download_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackProgress {
    pub status: TrackStatus,
    #[serde(default)]
    pub percentage: u32,
    #[serde(default)]
    pub message: String,
}

impl TrackProgress {
    pub fn into_core(self) -> mixtape_core::TrackProgress {
        mixtape_core::TrackProgress {
            status: self.status.into_core(),
            percentage: self.percentage.min(100) as u8,
            message: self.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    Started,
    Searching,
    Downloading,
    Converting,
    Completed,
    Error,
    Cancelled,
}

impl TrackStatus {
    pub fn into_core(self) -> mixtape_core::TrackStatus {
        match self {
            TrackStatus::Started => mixtape_core::TrackStatus::Started,
            TrackStatus::Searching => mixtape_core::TrackStatus::Searching,
            TrackStatus::Downloading => mixtape_core::TrackStatus::Downloading,
            TrackStatus::Converting => mixtape_core::TrackStatus::Converting,
            TrackStatus::Completed => mixtape_core::TrackStatus::Completed,
            TrackStatus::Error => mixtape_core::TrackStatus::Error,
            TrackStatus::Cancelled => mixtape_core::TrackStatus::Cancelled,
        }
    }
}
