//! Connectivity state manager.
//!
//! One process-wide online/offline mode, owned by the sync engine and
//! observed by everything else through a watch channel. Offline is
//! sticky: the only way back to Online is tearing the engine down and
//! starting a fresh one.

use tokio::sync::watch;

/// Reason shown when anonymous sign-in fails at startup.
pub const REASON_AUTH_OFFLINE: &str = "offline mode (local data)";

/// Reason shown when a live subscription errors out.
pub const REASON_REMOTE_UNREACHABLE: &str = "remote unreachable, showing local copy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityMode {
    Online,
    Offline,
}

/// Mode plus the human-readable reason for being offline, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityState {
    pub mode: ConnectivityMode,
    pub reason: Option<String>,
}

impl ConnectivityState {
    fn offline_pending() -> Self {
        Self {
            mode: ConnectivityMode::Offline,
            reason: None,
        }
    }
}

/// Owner side of the connectivity signal.
///
/// Auth failures and data-layer failures both land in [`set_offline`];
/// the OR of the two signals falls out of that naturally.
#[derive(Debug)]
pub struct Connectivity {
    tx: watch::Sender<ConnectivityState>,
}

impl Connectivity {
    /// Start in the offline-pending state: mode Offline, no reason yet.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ConnectivityState::offline_pending());
        Self { tx }
    }

    pub fn mode(&self) -> ConnectivityMode {
        self.tx.borrow().mode
    }

    pub fn state(&self) -> ConnectivityState {
        self.tx.borrow().clone()
    }

    /// Observe transitions as an event stream.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }

    /// Go online, clearing any error reason.
    pub fn set_online(&self) {
        let _ = self.tx.send(ConnectivityState {
            mode: ConnectivityMode::Online,
            reason: None,
        });
    }

    /// Go (and stay) offline with a user-visible reason.
    pub fn set_offline(&self, reason: impl Into<String>) {
        let _ = self.tx.send(ConnectivityState {
            mode: ConnectivityMode::Offline,
            reason: Some(reason.into()),
        });
    }

    /// Clear the data-layer error reason after a successful snapshot.
    pub fn clear_reason(&self) {
        self.tx.send_modify(|state| state.reason = None);
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_offline_pending() {
        let connectivity = Connectivity::new();
        let state = connectivity.state();
        assert_eq!(state.mode, ConnectivityMode::Offline);
        assert_eq!(state.reason, None);
    }

    #[test]
    fn test_online_clears_reason_and_offline_records_one() {
        let connectivity = Connectivity::new();
        connectivity.set_offline(REASON_AUTH_OFFLINE);
        assert_eq!(
            connectivity.state().reason.as_deref(),
            Some(REASON_AUTH_OFFLINE)
        );

        connectivity.set_online();
        let state = connectivity.state();
        assert_eq!(state.mode, ConnectivityMode::Online);
        assert_eq!(state.reason, None);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let connectivity = Connectivity::new();
        let mut rx = connectivity.subscribe();

        connectivity.set_online();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().mode, ConnectivityMode::Online);

        connectivity.set_offline(REASON_REMOTE_UNREACHABLE);
        rx.changed().await.unwrap();
        let state = rx.borrow().clone();
        assert_eq!(state.mode, ConnectivityMode::Offline);
        assert_eq!(state.reason.as_deref(), Some(REASON_REMOTE_UNREACHABLE));
    }
}
