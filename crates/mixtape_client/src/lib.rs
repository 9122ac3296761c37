//! Mixtape client: execution-service API, progress polling and effect
//! execution for the session state machine in `mixtape_core`.
mod api;
mod driver;
mod poller;
mod session;
mod types;

pub use api::{ApiError, ClientSettings, ExecutionApi, HttpExecutionClient};
pub use driver::{EffectRunner, SessionDriver};
pub use poller::{spawn_poller, PollerHandle, DEFAULT_POLL_INTERVAL};
pub use session::generate_session_id;
pub use types::{
    DownloadAck, ProgressSnapshot, SnapshotStatus, TrackDescriptor, TrackProgress, TrackStatus,
};
