use chrono::Utc;
use mixtape_core::SessionId;
use uuid::Uuid;

/// Produces a session token unique with overwhelming probability for the
/// lifetime of the process: millisecond timestamp plus a random suffix.
/// The token is not a security credential.
pub fn generate_session_id() -> SessionId {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", millis, &suffix[..12])
}
