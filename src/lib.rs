//! VLAN-oriented IP address management
//!
//! Tracks VLANs (named, numbered IPv4 blocks) and hosts, allocating one
//! address per (host, VLAN) pair from the VLAN's free pool:
//! - Dotted-quad / integer address codec and CIDR mask arithmetic
//! - Deterministic lowest-free address allocation with exhaustion reporting
//! - Cascading VLAN/host deletion with all-or-nothing host creation
//! - REST API for management and name/address resolution

pub mod addr;
pub mod allocator;
pub mod api;
pub mod error;
pub mod models;
pub mod service;

// Re-export core types
pub use allocator::next_free_address;
pub use api::{create_router, start_server, ApiServerConfig, AppState};
pub use error::{Error, Result};
pub use models::{Address, Host, Vlan};
pub use service::{IpamManager, IpamStats, VlanSelector};
