use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::client_debug;
use mixtape_core::{Msg, PollOutcome, SessionId};

use crate::api::ExecutionApi;

/// Reference interval: quick enough for responsive display, slow enough
/// to keep request volume reasonable for jobs running minutes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Owned handle to one recurring progress poll. Dropping the handle
/// stops the loop; every termination path must end up here.
pub struct PollerHandle {
    session_id: SessionId,
    stop: Arc<AtomicBool>,
}

impl PollerHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns the recurring poll loop for one session. The loop issues one
/// request at a time: query, publish the outcome, sleep, repeat. A
/// failed query publishes `PollOutcome::Unavailable` and the loop keeps
/// going; only the handle (or a closed channel) ends it.
pub fn spawn_poller(
    api: Arc<dyn ExecutionApi>,
    session_id: SessionId,
    interval: Duration,
    msg_tx: mpsc::Sender<Msg>,
) -> PollerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let sid = session_id.clone();

    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        runtime.block_on(async move {
            loop {
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }
                let poll = match api.fetch_progress(&sid).await {
                    Ok(snapshot) => PollOutcome::Snapshot(snapshot.into_core()),
                    Err(err) => {
                        client_debug!("progress poll for {} skipped: {}", sid, err);
                        PollOutcome::Unavailable
                    }
                };
                // A stop observed here means the response lost the race
                // with cancellation; it must not reach the state.
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }
                let msg = Msg::PollArrived {
                    session_id: sid.clone(),
                    poll,
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        });
    });

    PollerHandle { session_id, stop }
}
