//! Data models for IPAM entities

mod address;
mod host;
mod vlan;

pub use address::Address;
pub use host::Host;
pub use vlan::Vlan;
