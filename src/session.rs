//! Ledger session lifecycle
//!
//! Owns the one logical connection to the ledger client. The session is an
//! explicit state machine instead of a process-global nulled handle: every
//! operation calls `ensure_connected` first, and a disconnect notification
//! transitions the state so the next operation reconnects.

use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::ledger::{LedgerClient, LedgerError};

/// Connection lifecycle state
///
/// An in-flight connect is not a separate state: the state lock is held
/// across the connect await, so from the outside the session is simply
/// still disconnected until the connect resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Cached session around a ledger client
///
/// The state lock is held across the connect await, so concurrent first
/// callers serialize on a single connect attempt instead of racing.
pub struct LedgerSession {
    client: Arc<dyn LedgerClient>,
    state: Mutex<ConnectionState>,
}

impl LedgerSession {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self {
            client,
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }

    /// The underlying ledger client
    pub fn client(&self) -> &Arc<dyn LedgerClient> {
        &self.client
    }

    /// Current lifecycle state
    pub async fn state(&self) -> ConnectionState {
        *self.state.lock().await
    }

    /// Return once a live connection exists, connecting lazily if needed
    ///
    /// Connect failures propagate to the caller and leave the session
    /// disconnected; there is no retry policy here.
    pub async fn ensure_connected(&self) -> Result<(), LedgerError> {
        let mut state = self.state.lock().await;
        if *state == ConnectionState::Connected {
            return Ok(());
        }

        match self.client.connect().await {
            Ok(()) => {
                *state = ConnectionState::Connected;
                debug!("ledger session established");
                Ok(())
            }
            // A failed connect leaves the state untouched: still disconnected.
            Err(e) => Err(e),
        }
    }

    /// Handle a transport disconnect notification
    ///
    /// The next `ensure_connected` call will open a fresh connection.
    pub async fn notify_disconnected(&self) {
        let mut state = self.state.lock().await;
        if *state == ConnectionState::Connected {
            warn!("ledger session disconnected");
        }
        *state = ConnectionState::Disconnected;
    }
}
