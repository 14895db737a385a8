//! Error types for VLAN and address management

use thiserror::Error;

/// Result type for IPAM operations
pub type Result<T> = std::result::Result<T, Error>;

/// IPAM service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // VLAN errors
    #[error("Vlan not found: {0}")]
    VlanNotFound(String),

    #[error("Vlan name '{0}' already exists")]
    VlanNameInUse(String),

    #[error("Vlan number {0} already exists")]
    VlanNumberInUse(u16),

    #[error("Unknown vlan number: {0}")]
    UnknownVlan(u16),

    // Host errors
    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Host name '{0}' already exists")]
    HostNameInUse(String),

    #[error("Vlan number {0} given more than once in request")]
    DuplicateVlanRequested(u16),

    // Address errors
    #[error("No address allocated for {0}")]
    AddressNotFound(String),

    #[error("{allocated} addresses allocated on {cidr}")]
    PoolExhausted { cidr: String, allocated: usize },

    // Input errors
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Missing query parameter: {0}")]
    MissingQuery(String),
}
