use std::collections::BTreeMap;

use mixtape_core::{
    update, AppState, Effect, Lifecycle, Msg, NoticeKind, PollOutcome, ProgressSnapshot,
    SnapshotStatus, TrackInfo,
};

fn track(title: &str, artist: &str) -> TrackInfo {
    TrackInfo {
        id: None,
        title: title.to_string(),
        artist: artist.to_string(),
    }
}

fn with_tracks(tracks: Vec<TrackInfo>) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::UrlChanged("https://playlists.example/abc".to_string()),
    );
    let (state, _) = update(state, Msg::ConvertClicked);
    let (state, _) = update(state, Msg::TracksLoaded(tracks));
    state
}

fn snapshot(total: u32, completed: u32, current: &str) -> ProgressSnapshot {
    ProgressSnapshot {
        total_tracks: total,
        completed_tracks: completed,
        current_track: current.to_string(),
        tracks: BTreeMap::new(),
        status: SnapshotStatus::InProgress,
        download_url: None,
    }
}

#[test]
fn download_with_empty_selection_is_rejected_locally() {
    let state = with_tracks(vec![track("One", "A")]);
    let (state, _) = update(state, Msg::DeselectAllClicked);

    let (next, effects) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = next.view();
    assert_eq!(view.lifecycle, Lifecycle::Idle);
    assert_eq!(view.notice.unwrap().kind, NoticeKind::Warning);
}

#[test]
fn download_creates_a_starting_session_and_submits_the_selection() {
    let state = with_tracks(vec![track("One", "A"), track("Two", "B"), track("Three", "C")]);
    let (state, _) = update(state, Msg::TrackToggled(1));

    let (next, effects) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::BeginDownload {
            session_id: "session_1".to_string(),
            playlist_url: "https://playlists.example/abc".to_string(),
            tracks: vec![track("One", "A"), track("Three", "C")],
        }]
    );
    let view = next.view();
    assert_eq!(view.lifecycle, Lifecycle::Starting);
    assert_eq!(view.session_id.as_deref(), Some("session_1"));
    assert_eq!(view.total_tracks, 2);
    assert_eq!(view.completed_tracks, 0);
    assert_eq!(view.current_track, "");
}

#[test]
fn acceptance_moves_the_session_to_running_and_starts_polling() {
    let state = with_tracks(vec![track("One", "A")]);
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );

    let (next, effects) = update(
        state,
        Msg::DownloadAccepted {
            session_id: "session_1".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session_id: "session_1".to_string(),
        }]
    );
    assert_eq!(next.view().lifecycle, Lifecycle::Running);
}

#[test]
fn acceptance_for_a_superseded_session_is_ignored() {
    let state = with_tracks(vec![track("One", "A")]);
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_2".to_string(),
        },
    );

    let (next, effects) = update(
        state,
        Msg::DownloadAccepted {
            session_id: "session_1".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(next.view().lifecycle, Lifecycle::Starting);
    assert_eq!(next.view().session_id.as_deref(), Some("session_2"));
}

#[test]
fn rejection_returns_to_idle_without_polling() {
    let state = with_tracks(vec![track("One", "A")]);
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );

    let (next, effects) = update(
        state,
        Msg::DownloadRejected {
            session_id: "session_1".to_string(),
            reason: "http status 500".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = next.view();
    assert_eq!(view.lifecycle, Lifecycle::Idle);
    assert_eq!(view.session_id, None);
    assert_eq!(view.notice.unwrap().kind, NoticeKind::Error);
    // The track listing survives for a retry.
    assert_eq!(view.tracks.len(), 1);
    assert_eq!(view.selected_count, 1);
}

#[test]
fn starting_a_new_session_stops_the_previous_poller_first() {
    let state = with_tracks(vec![track("One", "A"), track("Two", "B")]);
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadAccepted {
            session_id: "session_1".to_string(),
        },
    );

    let (next, effects) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_2".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::StopPolling,
            Effect::BeginDownload {
                session_id: "session_2".to_string(),
                playlist_url: "https://playlists.example/abc".to_string(),
                tracks: vec![track("One", "A"), track("Two", "B")],
            },
        ]
    );
    assert_eq!(next.view().session_id.as_deref(), Some("session_2"));
    assert_eq!(next.view().lifecycle, Lifecycle::Starting);
}

#[test]
fn polls_for_a_superseded_session_never_mutate_the_new_one() {
    let state = with_tracks(vec![track("One", "A"), track("Two", "B")]);
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_1".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadAccepted {
            session_id: "session_1".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadClicked {
            session_id: "session_2".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadAccepted {
            session_id: "session_2".to_string(),
        },
    );

    let (next, effects) = update(
        state.clone(),
        Msg::PollArrived {
            session_id: "session_1".to_string(),
            poll: PollOutcome::Snapshot(snapshot(2, 2, "stale")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(next, state);
    assert_eq!(next.view().completed_tracks, 0);
}
