//! VLAN model

use crate::addr::{cidr_mask, format_ipv4};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, numbered IPv4 address block
///
/// The block is defined by its network address and prefix length and holds
/// `2^(32 - prefix_len)` addresses. Every address allocated in the VLAN
/// satisfies `value & cidr_mask(prefix_len) == network`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    /// Unique VLAN identifier
    pub id: Uuid,
    /// Human-readable name, globally unique
    pub name: String,
    /// VLAN tag, globally unique
    pub number: u16,
    /// Network address of the block
    pub network: u32,
    /// Prefix length (0-32)
    pub prefix_len: u8,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Vlan {
    /// Create a new VLAN over the given block
    pub fn new(name: impl Into<String>, number: u16, network: u32, prefix_len: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            number,
            network,
            prefix_len,
            created_at: Utc::now(),
        }
    }

    /// The block in CIDR notation, e.g. `"10.11.12.0/24"`
    pub fn cidr_string(&self) -> String {
        format!("{}/{}", format_ipv4(self.network), self.prefix_len)
    }

    /// Whether an address value lies inside this VLAN's block
    pub fn contains(&self, value: u32) -> bool {
        value & cidr_mask(self.prefix_len) == self.network
    }
}
