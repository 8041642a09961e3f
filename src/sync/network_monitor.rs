//! # Network Monitor
//!
//! Shared connectivity state fed by the host platform. The monitor itself
//! performs no probing: whatever layer owns the OS network callbacks pushes
//! transitions in through [`NetworkMonitor::set`], and the sync pipeline
//! reads the latest value when deciding whether to transmit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Connectivity as last reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Reachable with full connectivity
    Online,
    /// Reachable but degraded (captive portal, metered fallback)
    Limited,
    /// No usable network path
    Offline,
}

impl Connectivity {
    /// Whether sync traffic is worth attempting. Limited connectivity still
    /// counts: the transport finds out the hard way if the path is unusable.
    pub fn is_online(self) -> bool {
        !matches!(self, Connectivity::Offline)
    }
}

/// Cloneable handle to the shared connectivity state.
///
/// Clones observe the same underlying value, so one handle can live in the
/// platform bridge while others sit inside the sync service and reporter.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    state: Arc<RwLock<Connectivity>>,
}

impl NetworkMonitor {
    pub fn new(initial: Connectivity) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// Record a connectivity transition reported by the platform.
    pub async fn set(&self, connectivity: Connectivity) {
        let mut state = self.state.write().await;
        if *state != connectivity {
            tracing::info!(from = ?*state, to = ?connectivity, "connectivity changed");
        }
        *state = connectivity;
    }

    /// The most recently reported connectivity.
    pub async fn current(&self) -> Connectivity {
        *self.state.read().await
    }

    pub async fn is_online(&self) -> bool {
        self.current().await.is_online()
    }
}

impl Default for NetworkMonitor {
    /// Assume online until the platform reports otherwise.
    fn default() -> Self {
        Self::new(Connectivity::Online)
    }
}
