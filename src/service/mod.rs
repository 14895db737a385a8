//! IPAM orchestration service

mod manager;

pub use manager::{IpamManager, IpamStats, VlanSelector};
