use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use mixtape_core::{update, AppState, AppViewModel, Effect, Msg};

use crate::api::ExecutionApi;
use crate::poller::{spawn_poller, PollerHandle, DEFAULT_POLL_INTERVAL};
use crate::types::TrackDescriptor;

enum ApiCall {
    Convert {
        playlist_url: String,
    },
    Begin {
        session_id: String,
        playlist_url: String,
        tracks: Vec<TrackDescriptor>,
    },
    Cancel {
        session_id: String,
    },
}

/// Executes the effects the state machine returns. Network calls run on
/// a background runtime thread and feed their outcomes back in as
/// messages; the poller slot holds at most one live handle.
pub struct EffectRunner {
    api: Arc<dyn ExecutionApi>,
    msg_tx: mpsc::Sender<Msg>,
    call_tx: mpsc::Sender<ApiCall>,
    poll_interval: Duration,
    poller: Option<PollerHandle>,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn ExecutionApi>,
        msg_tx: mpsc::Sender<Msg>,
        poll_interval: Duration,
    ) -> Self {
        let (call_tx, call_rx) = mpsc::channel();
        spawn_call_loop(api.clone(), call_rx, msg_tx.clone());
        Self {
            api,
            msg_tx,
            call_tx,
            poll_interval,
            poller: None,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ConvertPlaylist { playlist_url } => {
                    let _ = self.call_tx.send(ApiCall::Convert { playlist_url });
                }
                Effect::BeginDownload {
                    session_id,
                    playlist_url,
                    tracks,
                } => {
                    let tracks = tracks.iter().map(TrackDescriptor::from_core).collect();
                    let _ = self.call_tx.send(ApiCall::Begin {
                        session_id,
                        playlist_url,
                        tracks,
                    });
                }
                Effect::StartPolling { session_id } => {
                    // Replacing the slot stops any previous poller on drop.
                    self.poller = Some(spawn_poller(
                        self.api.clone(),
                        session_id,
                        self.poll_interval,
                        self.msg_tx.clone(),
                    ));
                }
                Effect::StopPolling => {
                    if let Some(poller) = self.poller.take() {
                        poller.stop();
                    }
                }
                Effect::NotifyCancel { session_id } => {
                    let _ = self.call_tx.send(ApiCall::Cancel { session_id });
                }
            }
        }
    }

    /// Session currently being polled, if a poller is live.
    pub fn polling_session(&self) -> Option<&str> {
        self.poller
            .as_ref()
            .filter(|poller| !poller.is_stopped())
            .map(|poller| poller.session_id())
    }
}

fn spawn_call_loop(
    api: Arc<dyn ExecutionApi>,
    call_rx: mpsc::Receiver<ApiCall>,
    msg_tx: mpsc::Sender<Msg>,
) {
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        while let Ok(call) = call_rx.recv() {
            let api = api.clone();
            let msg_tx = msg_tx.clone();
            runtime.spawn(async move {
                handle_call(api.as_ref(), call, msg_tx).await;
            });
        }
    });
}

async fn handle_call(api: &dyn ExecutionApi, call: ApiCall, msg_tx: mpsc::Sender<Msg>) {
    match call {
        ApiCall::Convert { playlist_url } => {
            let msg = match api.convert_playlist(&playlist_url).await {
                Ok(tracks) => Msg::TracksLoaded(
                    tracks.into_iter().map(TrackDescriptor::into_core).collect(),
                ),
                Err(err) => Msg::ConvertFailed {
                    reason: err.to_string(),
                },
            };
            let _ = msg_tx.send(msg);
        }
        ApiCall::Begin {
            session_id,
            playlist_url,
            tracks,
        } => {
            let msg = match api.start_download(&playlist_url, &tracks, &session_id).await {
                Ok(ack) => {
                    client_info!("download accepted for {}", ack.session_id);
                    Msg::DownloadAccepted { session_id }
                }
                Err(err) => Msg::DownloadRejected {
                    session_id,
                    reason: err.to_string(),
                },
            };
            let _ = msg_tx.send(msg);
        }
        ApiCall::Cancel { session_id } => {
            if let Err(err) = api.cancel_session(&session_id).await {
                client_warn!("cancel signal for {} failed: {}", session_id, err);
                let _ = msg_tx.send(Msg::CancelNotifyFailed { session_id });
            }
        }
    }
}

/// Owns the state machine and its effect runner: messages go in through
/// `dispatch`, collaborator results drain through `pump`.
pub struct SessionDriver {
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl SessionDriver {
    pub fn new(api: Arc<dyn ExecutionApi>) -> Self {
        Self::with_poll_interval(api, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(api: Arc<dyn ExecutionApi>, poll_interval: Duration) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(api, msg_tx.clone(), poll_interval);
        Self {
            state: AppState::new(),
            runner,
            msg_tx,
            msg_rx,
        }
    }

    /// Sender for feeding messages in from other threads.
    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    /// Applies every collaborator result that arrived since the last
    /// call; returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Session currently being polled, if any.
    pub fn polling_session(&self) -> Option<&str> {
        self.runner.polling_session()
    }
}
