use thiserror::Error;

/// Errors surfaced by the sync layer.
///
/// Local cache failures never appear here (the cache absorbs them) and
/// codec failures degrade to `None` before reaching this type. Nothing
/// in this taxonomy is retried automatically; recovery is either a
/// fresh engine start or the user repeating the action.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Mutations are rejected outright while offline; they are never
    /// queued for later replay.
    #[error("cannot modify data while offline")]
    Offline,

    #[error("anonymous sign-in failed: {0}")]
    AuthFailed(String),

    #[error("remote write failed: {0}")]
    RemoteWrite(String),

    /// The import payload is structurally unusable: it lacks the
    /// recipes sequence or the meal-plan mapping.
    #[error("invalid backup data: {0}")]
    InvalidImport(String),

    #[error("failed to encode backup: {0}")]
    Export(String),

    /// The engine task is gone (shut down or crashed).
    #[error("sync engine is no longer running")]
    Closed,
}
