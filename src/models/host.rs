//! Host model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named entity holding at most one allocated address per VLAN
///
/// The host's VLAN memberships are derived from its addresses, never stored
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    /// Unique host identifier
    pub id: Uuid,
    /// Human-readable name, globally unique
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
