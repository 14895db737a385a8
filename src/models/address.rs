//! Allocated address model

use crate::addr::format_ipv4;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One allocated IP value, bound to exactly one VLAN and one Host
///
/// Created only as a side effect of host creation; removed when either
/// owner is deleted. No two addresses in a VLAN share a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Unique address row identifier
    pub id: Uuid,
    /// The 32-bit address value
    pub value: u32,
    /// Owning VLAN
    pub vlan_id: Uuid,
    /// Owning host
    pub host_id: Uuid,
    /// Allocation timestamp
    pub created_at: DateTime<Utc>,
}

impl Address {
    pub fn new(value: u32, vlan_id: Uuid, host_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            vlan_id,
            host_id,
            created_at: Utc::now(),
        }
    }

    /// Dotted-quad rendering of the value
    pub fn to_dotted(&self) -> String {
        format_ipv4(self.value)
    }
}
