use crate::{Lifecycle, SessionId, TrackProgress};

/// One-shot user notification, replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub playlist_url: String,
    pub converting: bool,
    pub lifecycle: Lifecycle,
    pub session_id: Option<SessionId>,
    pub tracks: Vec<TrackRowView>,
    pub selected_count: usize,
    pub total_tracks: u32,
    pub completed_tracks: u32,
    pub overall_percentage: u8,
    pub current_track: String,
    pub artifact_url: Option<String>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRowView {
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub selected: bool,
    pub progress: Option<TrackProgress>,
}
