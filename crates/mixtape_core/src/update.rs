use crate::{AppState, Effect, Lifecycle, Msg, Notice, PollOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            if state.input_locked() {
                return (state, Vec::new());
            }
            state.set_playlist_url(url);
            Vec::new()
        }
        Msg::ConvertClicked => {
            if state.input_locked() {
                return (state, Vec::new());
            }
            if state.playlist_url().trim().is_empty() {
                state.set_notice(Notice::warning("Enter a playlist URL first"));
                return (state, Vec::new());
            }
            let playlist_url = state.playlist_url().trim().to_string();
            state.begin_convert();
            vec![Effect::ConvertPlaylist { playlist_url }]
        }
        Msg::TracksLoaded(tracks) => {
            if !state.is_converting() {
                return (state, Vec::new());
            }
            let count = tracks.len();
            state.tracks_loaded(tracks);
            state.set_notice(Notice::success(format!("{count} tracks found")));
            Vec::new()
        }
        Msg::ConvertFailed { reason } => {
            if !state.is_converting() {
                return (state, Vec::new());
            }
            state.convert_failed();
            state.set_notice(Notice::error(format!(
                "Could not convert the playlist: {reason}"
            )));
            Vec::new()
        }
        Msg::TrackToggled(index) => {
            if state.lifecycle().is_in_flight() {
                return (state, Vec::new());
            }
            state.toggle_track(index);
            Vec::new()
        }
        Msg::SelectAllClicked => {
            if state.lifecycle().is_in_flight() {
                return (state, Vec::new());
            }
            state.set_all_selected(true);
            Vec::new()
        }
        Msg::DeselectAllClicked => {
            if state.lifecycle().is_in_flight() {
                return (state, Vec::new());
            }
            state.set_all_selected(false);
            Vec::new()
        }
        Msg::DownloadClicked { session_id } => {
            if state.selected_count() == 0 {
                state.set_notice(Notice::warning("Select at least one track"));
                return (state, Vec::new());
            }

            // A new session supersedes any previous one; its poller must
            // be stopped before the replacement's ever starts.
            let superseded = state.session_id().is_some();
            let playlist_url = state.playlist_url().trim().to_string();
            let tracks = state.begin_session(session_id.clone());

            let mut effects = Vec::with_capacity(2);
            if superseded {
                effects.push(Effect::StopPolling);
            }
            effects.push(Effect::BeginDownload {
                session_id,
                playlist_url,
                tracks,
            });
            effects
        }
        Msg::DownloadAccepted { session_id } => {
            if state.session_accepted(&session_id) {
                state.set_notice(Notice::info("Download started; progress below"));
                vec![Effect::StartPolling { session_id }]
            } else {
                Vec::new()
            }
        }
        Msg::DownloadRejected { session_id, reason } => {
            if state.session_rejected(&session_id) {
                state.set_notice(Notice::error(format!(
                    "Could not start the download: {reason}"
                )));
            }
            Vec::new()
        }
        Msg::PollArrived { session_id, poll } => {
            // Snapshots for superseded or no-longer-running sessions are
            // discarded, never reapplied.
            if !state.is_active_session(&session_id)
                || state.lifecycle() != Lifecycle::Running
            {
                return (state, Vec::new());
            }
            match poll {
                // Transient failure: skip this tick, retry on the next.
                PollOutcome::Unavailable => Vec::new(),
                PollOutcome::Snapshot(snapshot) => {
                    state.apply_snapshot(snapshot);
                    match state.lifecycle() {
                        Lifecycle::Completed | Lifecycle::Failed => vec![Effect::StopPolling],
                        _ => Vec::new(),
                    }
                }
            }
        }
        Msg::CancelClicked => match state.cancel_active() {
            Some(session_id) => {
                state.set_notice(Notice::warning("Download cancelled"));
                vec![Effect::StopPolling, Effect::NotifyCancel { session_id }]
            }
            None => Vec::new(),
        },
        Msg::CancelNotifyFailed { session_id } => {
            if state.is_active_session(&session_id) {
                state.set_notice(Notice::warning(
                    "Could not reach the server; the job may still be running remotely",
                ));
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
