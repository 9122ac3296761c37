#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the execution service for the playlist's track listing.
    ConvertPlaylist { playlist_url: String },
    /// Submit the selected tracks for processing under a new session.
    BeginDownload {
        session_id: crate::SessionId,
        playlist_url: String,
        tracks: Vec<crate::TrackInfo>,
    },
    /// Start the recurring progress poll for a session.
    StartPolling { session_id: crate::SessionId },
    /// Stop the active progress poll, if any.
    StopPolling,
    /// Tell the execution service to stop a session (best effort).
    NotifyCancel { session_id: crate::SessionId },
}
