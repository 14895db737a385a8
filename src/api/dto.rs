//! Data Transfer Objects for the REST API
//!
//! Request and response types for API endpoints. The simple/full response
//! pairs mirror the two rendering depths of the VLAN and host resources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// VLAN DTOs
// ============================================================================

/// Request to create a new VLAN
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVlanRequest {
    /// VLAN tag, globally unique
    pub number: u16,
    /// Human-readable name, globally unique
    pub name: String,
    /// The block in CIDR notation, e.g. "10.11.12.0/24"
    pub mask: String,
}

/// VLAN listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanSimple {
    pub name: String,
    pub number: u16,
    /// The block in CIDR notation
    pub range: String,
    /// Lookup URL for the full record
    pub url: String,
}

/// Detailed VLAN record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanFull {
    pub name: String,
    pub number: u16,
    pub range: String,
    /// Names of hosts holding an address in this VLAN
    pub hosts: Vec<String>,
}

// ============================================================================
// Host DTOs
// ============================================================================

/// Request to create a new host
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHostRequest {
    /// Human-readable name, globally unique
    pub name: String,
    /// Numbers of the VLANs to allocate an address in
    #[serde(default)]
    pub vlans: Vec<u16>,
}

/// Host listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSimple {
    pub name: String,
    /// Numbers of the VLANs the host holds addresses in
    pub vlans: Vec<u16>,
    /// Lookup URL for the full record
    pub url: String,
}

/// Detailed host record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostFull {
    pub name: String,
    /// VLAN number (as string) to dotted-quad address
    pub ips: BTreeMap<String, String>,
}

// ============================================================================
// Query DTOs
// ============================================================================

/// Query parameters for the resolve endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResolveQuery {
    /// Dotted-quad address to resolve to a label
    pub ip: Option<String>,
    /// Host name fragment to search for
    pub hostname: Option<String>,
}

// ============================================================================
// Error / ack wrappers
// ============================================================================

/// Error payload returned alongside a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new("PRECONDITION_FAILED", message)
    }
}

/// Acknowledgement body for accepted deletions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResponse {
    pub success: bool,
    pub message: String,
}

impl EmptyResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
