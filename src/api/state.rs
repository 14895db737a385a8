//! Application state for the API
//!
//! Holds the manager shared across all handlers. The `RwLock` is the unit
//! of work boundary: handlers take the write guard for every mutating
//! operation, so an allocation read and the persistence of its result are
//! never interleaved with another writer, and cascade deletes are never
//! observed half-done.

use crate::service::IpamManager;
use tokio::sync::RwLock;

/// Application state shared across handlers
pub struct AppState {
    /// IPAM manager service
    pub manager: RwLock<IpamManager>,
}

impl AppState {
    /// Create new application state with an empty store
    pub fn new() -> Self {
        Self {
            manager: RwLock::new(IpamManager::new()),
        }
    }

    /// Create with a pre-populated manager
    pub fn with_manager(manager: IpamManager) -> Self {
        Self {
            manager: RwLock::new(manager),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
