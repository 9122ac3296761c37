#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the playlist URL input box (debounced text).
    UrlChanged(String),
    /// User asked to look up the playlist's track listing.
    ConvertClicked,
    /// Execution service answered a conversion request.
    TracksLoaded(Vec<crate::TrackInfo>),
    /// Conversion request was rejected or failed in transport.
    ConvertFailed { reason: String },
    /// User toggled one track's selection checkbox.
    TrackToggled(usize),
    /// User selected every track.
    SelectAllClicked,
    /// User cleared the selection.
    DeselectAllClicked,
    /// User committed to downloading the current selection under a
    /// freshly generated session identifier.
    DownloadClicked { session_id: crate::SessionId },
    /// Execution service acknowledged the download request.
    DownloadAccepted { session_id: crate::SessionId },
    /// Execution service rejected the download request.
    DownloadRejected {
        session_id: crate::SessionId,
        reason: String,
    },
    /// One progress poll finished for a session.
    PollArrived {
        session_id: crate::SessionId,
        poll: PollOutcome,
    },
    /// User clicked Cancel.
    CancelClicked,
    /// The best-effort stop signal did not reach the execution service.
    CancelNotifyFailed { session_id: crate::SessionId },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Outcome of a single progress poll against the execution service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The service answered with the full current progress picture.
    Snapshot(crate::ProgressSnapshot),
    /// Transport or server failure; the tick is skipped and retried.
    Unavailable,
}
