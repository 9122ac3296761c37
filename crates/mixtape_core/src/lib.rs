//! Mixtape core: pure session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, PollOutcome};
pub use state::{
    AppState, Lifecycle, OverallProgress, ProgressSnapshot, SessionId, SnapshotStatus, TrackInfo,
    TrackKey, TrackProgress, TrackStatus,
};
pub use update::update;
pub use view_model::{AppViewModel, Notice, NoticeKind, TrackRowView};
