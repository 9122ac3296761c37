use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, Notice, TrackRowView};

pub type SessionId = String;
pub type TrackKey = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Starting,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl Lifecycle {
    /// True between the user committing and the session reaching a
    /// terminal state; selection and input edits are rejected meanwhile.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Lifecycle::Starting | Lifecycle::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
}

impl TrackInfo {
    pub fn label(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
    /// Terminal states are never overwritten by later snapshots except
    /// through the explicit cancellation override.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TrackStatus::Completed | TrackStatus::Error | TrackStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackProgress {
    pub status: TrackStatus,
    pub percentage: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverallProgress {
    pub total_tracks: u32,
    pub completed_tracks: u32,
    pub current_track: String,
}

/// The full progress picture carried by one poll response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total_tracks: u32,
    pub completed_tracks: u32,
    pub current_track: String,
    pub tracks: BTreeMap<TrackKey, TrackProgress>,
    pub status: SnapshotStatus,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStatus {
    InProgress,
    Completed,
}

/// One selected track as frozen into a session, with the key the
/// execution service reports its progress under: the track's identifier
/// or, failing that, its ordinal position in the submitted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectedTrack {
    key: TrackKey,
    source_index: usize,
    info: TrackInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DownloadSession {
    id: SessionId,
    lifecycle: Lifecycle,
    selected: Vec<SelectedTrack>,
    overall: OverallProgress,
    items: BTreeMap<TrackKey, TrackProgress>,
    artifact_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    playlist_url: String,
    converting: bool,
    tracks: Vec<TrackInfo>,
    selected: Vec<bool>,
    session: Option<DownloadSession>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.session
            .as_ref()
            .map(|session| session.lifecycle)
            .unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.id.as_str())
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let session = self.session.as_ref();
        let overall = session
            .map(|session| session.overall.clone())
            .unwrap_or_default();
        let overall_percentage = if overall.total_tracks > 0 {
            (u64::from(overall.completed_tracks) * 100 / u64::from(overall.total_tracks)) as u8
        } else {
            0
        };

        let tracks = self
            .tracks
            .iter()
            .enumerate()
            .map(|(index, info)| TrackRowView {
                index,
                title: info.title.clone(),
                artist: info.artist.clone(),
                selected: self.selected.get(index).copied().unwrap_or(false),
                progress: session.and_then(|session| session.progress_for(index)),
            })
            .collect();

        AppViewModel {
            playlist_url: self.playlist_url.clone(),
            converting: self.converting,
            lifecycle: self.lifecycle(),
            session_id: session.map(|session| session.id.clone()),
            tracks,
            selected_count: self.selected.iter().filter(|selected| **selected).count(),
            total_tracks: overall.total_tracks,
            completed_tracks: overall.completed_tracks,
            overall_percentage,
            current_track: overall.current_track,
            artifact_url: session.and_then(|session| session.artifact_url.clone()),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn input_locked(&self) -> bool {
        self.converting || self.lifecycle().is_in_flight()
    }

    pub(crate) fn set_playlist_url(&mut self, url: String) {
        self.playlist_url = url;
        self.dirty = true;
    }

    pub(crate) fn playlist_url(&self) -> &str {
        &self.playlist_url
    }

    pub(crate) fn is_converting(&self) -> bool {
        self.converting
    }

    /// Clears the previous track listing and any superseded session
    /// record, then marks a conversion request as in flight.
    pub(crate) fn begin_convert(&mut self) {
        self.converting = true;
        self.tracks.clear();
        self.selected.clear();
        self.session = None;
        self.dirty = true;
    }

    /// Installs a freshly converted track listing, everything selected.
    pub(crate) fn tracks_loaded(&mut self, tracks: Vec<TrackInfo>) {
        self.selected = vec![true; tracks.len()];
        self.tracks = tracks;
        self.converting = false;
        self.dirty = true;
    }

    pub(crate) fn convert_failed(&mut self) {
        self.converting = false;
        self.dirty = true;
    }

    pub(crate) fn toggle_track(&mut self, index: usize) {
        if let Some(selected) = self.selected.get_mut(index) {
            *selected = !*selected;
            self.dirty = true;
        }
    }

    pub(crate) fn set_all_selected(&mut self, selected: bool) {
        self.selected.iter_mut().for_each(|slot| *slot = selected);
        self.dirty = true;
    }

    pub(crate) fn selected_count(&self) -> usize {
        self.selected.iter().filter(|selected| **selected).count()
    }

    /// Replaces any previous session with a new one covering the current
    /// selection, in track-listing order. Returns the tracks to submit.
    pub(crate) fn begin_session(&mut self, session_id: SessionId) -> Vec<TrackInfo> {
        let selected: Vec<SelectedTrack> = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(index, _)| self.selected.get(*index).copied().unwrap_or(false))
            .enumerate()
            .map(|(position, (source_index, info))| SelectedTrack {
                key: info
                    .id
                    .clone()
                    .unwrap_or_else(|| position.to_string()),
                source_index,
                info: info.clone(),
            })
            .collect();

        let submitted = selected
            .iter()
            .map(|track| track.info.clone())
            .collect::<Vec<_>>();

        self.session = Some(DownloadSession {
            id: session_id,
            lifecycle: Lifecycle::Starting,
            overall: OverallProgress {
                total_tracks: selected.len() as u32,
                completed_tracks: 0,
                current_track: String::new(),
            },
            selected,
            items: BTreeMap::new(),
            artifact_url: None,
        });
        self.dirty = true;
        submitted
    }

    pub(crate) fn is_active_session(&self, session_id: &str) -> bool {
        self.session_id() == Some(session_id)
    }

    /// Moves the active session from `Starting` to `Running` once the
    /// execution service acknowledges it.
    pub(crate) fn session_accepted(&mut self, session_id: &str) -> bool {
        match self.session.as_mut() {
            Some(session)
                if session.id == session_id && session.lifecycle == Lifecycle::Starting =>
            {
                session.lifecycle = Lifecycle::Running;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Drops the session record for a rejected download request.
    pub(crate) fn session_rejected(&mut self, session_id: &str) -> bool {
        match self.session.as_ref() {
            Some(session)
                if session.id == session_id && session.lifecycle == Lifecycle::Starting =>
            {
                self.session = None;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Overwrites overall and per-track progress wholesale with the
    /// snapshot's values; the last poll wins. Detects completion.
    pub(crate) fn apply_snapshot(&mut self, snapshot: ProgressSnapshot) {
        let notice = match self.session.as_mut() {
            Some(session) if session.lifecycle == Lifecycle::Running => {
                session.overall.total_tracks = snapshot.total_tracks;
                session.overall.completed_tracks =
                    snapshot.completed_tracks.min(snapshot.total_tracks);
                session.overall.current_track = snapshot.current_track;
                session.items = snapshot
                    .tracks
                    .into_iter()
                    .map(|(key, progress)| {
                        let percentage = progress.percentage.min(100);
                        (key, TrackProgress { percentage, ..progress })
                    })
                    .collect();

                if snapshot.status == SnapshotStatus::Completed {
                    session.overall.current_track.clear();
                    match snapshot.download_url {
                        Some(url) => {
                            session.lifecycle = Lifecycle::Completed;
                            session.artifact_url = Some(url);
                            Some(Notice::success(format!(
                                "Download complete: {}/{} tracks",
                                session.overall.completed_tracks, session.overall.total_tracks
                            )))
                        }
                        None => {
                            session.lifecycle = Lifecycle::Failed;
                            Some(Notice::error(
                                "No tracks could be downloaded; check your connection and retry",
                            ))
                        }
                    }
                } else {
                    None
                }
            }
            _ => return,
        };

        if let Some(notice) = notice {
            self.notice = Some(notice);
        }
        self.dirty = true;
    }

    /// Forces every non-terminal track to `Cancelled` and ends the
    /// session; tracks already `Completed` or `Error` keep their real
    /// outcome. Returns the session id to notify, or `None` when no
    /// session is running (the operation is idempotent).
    pub(crate) fn cancel_active(&mut self) -> Option<SessionId> {
        let session = self.session.as_mut()?;
        if session.lifecycle != Lifecycle::Running {
            return None;
        }

        for progress in session.items.values_mut() {
            if !matches!(progress.status, TrackStatus::Completed | TrackStatus::Error) {
                progress.status = TrackStatus::Cancelled;
                progress.message = "Cancelled by user".to_string();
            }
        }
        session.lifecycle = Lifecycle::Cancelled;
        session.overall.current_track.clear();
        self.dirty = true;
        Some(session.id.clone())
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }
}

impl DownloadSession {
    fn progress_for(&self, source_index: usize) -> Option<TrackProgress> {
        let key = &self
            .selected
            .iter()
            .find(|track| track.source_index == source_index)?
            .key;
        self.items.get(key).cloned()
    }
}
