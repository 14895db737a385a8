//! IPAM manager service
//!
//! Owns the three entity tables (VLAN, Host, Address) and implements every
//! lifecycle operation: VLAN and host creation with uniqueness checks,
//! address allocation, cascading deletes, and the query/resolve lookups.
//!
//! The manager itself performs no locking across operations; callers that
//! mutate concurrently must serialize whole operations (the API layer holds
//! an exclusive lock per write request), which makes each method an atomic
//! unit of work. `create_host` additionally stages all of its allocations
//! before the first insert, so a failure on any VLAN leaves the store
//! untouched.

use crate::addr::{format_ipv4, parse_cidr};
use crate::allocator::next_free_address;
use crate::models::{Address, Host, Vlan};
use crate::{Error, Result};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Identifies a VLAN by number or by name
///
/// Path identifiers that parse as an integer are treated as numbers, so a
/// VLAN whose name is all digits can only be addressed by its number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VlanSelector {
    Number(u16),
    Name(String),
}

impl VlanSelector {
    /// Interpret a path identifier
    pub fn parse(ident: &str) -> Self {
        match ident.parse::<u16>() {
            Ok(number) => VlanSelector::Number(number),
            Err(_) => VlanSelector::Name(ident.to_string()),
        }
    }
}

impl fmt::Display for VlanSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanSelector::Number(number) => write!(f, "{}", number),
            VlanSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Counts over the three tables
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IpamStats {
    pub vlans: usize,
    pub hosts: usize,
    pub addresses: usize,
}

/// IPAM manager - the VLAN/Host/Address store and its operations
pub struct IpamManager {
    /// VLANs indexed by ID
    vlans: DashMap<Uuid, Vlan>,
    /// VLAN name uniqueness index
    vlans_by_name: DashMap<String, Uuid>,
    /// VLAN number uniqueness index
    vlans_by_number: DashMap<u16, Uuid>,
    /// Hosts indexed by ID
    hosts: DashMap<Uuid, Host>,
    /// Host name uniqueness index
    hosts_by_name: DashMap<String, Uuid>,
    /// Allocated addresses indexed by ID
    addresses: DashMap<Uuid, Address>,
}

impl IpamManager {
    pub fn new() -> Self {
        Self {
            vlans: DashMap::new(),
            vlans_by_name: DashMap::new(),
            vlans_by_number: DashMap::new(),
            hosts: DashMap::new(),
            hosts_by_name: DashMap::new(),
            addresses: DashMap::new(),
        }
    }

    // ==================== VLAN Operations ====================

    /// Create a new VLAN over the block given in CIDR notation
    ///
    /// Fails with a conflict if the name or number is taken, and with
    /// `InvalidCidr` if the mask text is malformed.
    pub fn create_vlan(&self, name: &str, number: u16, mask: &str) -> Result<Vlan> {
        if self.vlans_by_name.contains_key(name) {
            return Err(Error::VlanNameInUse(name.to_string()));
        }
        if self.vlans_by_number.contains_key(&number) {
            return Err(Error::VlanNumberInUse(number));
        }

        let (network, prefix_len) = parse_cidr(mask)?;
        let vlan = Vlan::new(name, number, network, prefix_len);

        self.vlans_by_name.insert(vlan.name.clone(), vlan.id);
        self.vlans_by_number.insert(vlan.number, vlan.id);
        self.vlans.insert(vlan.id, vlan.clone());

        tracing::info!(
            vlan = %vlan.name,
            number = vlan.number,
            cidr = %vlan.cidr_string(),
            "Created vlan"
        );

        Ok(vlan)
    }

    /// Look up a VLAN by number or name, exact match only
    pub fn find_vlan(&self, selector: &VlanSelector) -> Option<Vlan> {
        let id = match selector {
            VlanSelector::Number(number) => *self.vlans_by_number.get(number)?,
            VlanSelector::Name(name) => *self.vlans_by_name.get(name)?,
        };
        self.vlans.get(&id).map(|v| v.clone())
    }

    /// List all VLANs, ordered by number
    pub fn list_vlans(&self) -> Vec<Vlan> {
        let mut vlans: Vec<Vlan> = self.vlans.iter().map(|v| v.clone()).collect();
        vlans.sort_by_key(|v| v.number);
        vlans
    }

    /// Delete a VLAN and every address allocated in it
    pub fn delete_vlan(&self, selector: &VlanSelector) -> Result<()> {
        let vlan = self
            .find_vlan(selector)
            .ok_or_else(|| Error::VlanNotFound(selector.to_string()))?;

        // Cascade: address rows first, then the vlan and its index entries
        self.addresses.retain(|_, address| address.vlan_id != vlan.id);
        self.vlans_by_name.remove(&vlan.name);
        self.vlans_by_number.remove(&vlan.number);
        self.vlans.remove(&vlan.id);

        tracing::info!(vlan = %vlan.name, number = vlan.number, "Deleted vlan");

        Ok(())
    }

    /// Names of hosts holding an address in the VLAN, derived via the
    /// address table and sorted for stable rendering
    pub fn vlan_hosts(&self, vlan_id: Uuid) -> Vec<String> {
        let mut names: Vec<String> = self
            .addresses
            .iter()
            .filter(|address| address.vlan_id == vlan_id)
            .filter_map(|address| self.hosts.get(&address.host_id).map(|h| h.name.clone()))
            .collect();
        names.sort();
        names
    }

    // ==================== Host Operations ====================

    /// Create a host and allocate one address in each requested VLAN
    ///
    /// The whole operation is all-or-nothing: an unknown VLAN number, a
    /// duplicate number in the request, or an exhausted block aborts before
    /// anything is written.
    pub fn create_host(&self, name: &str, vlan_numbers: &[u16]) -> Result<Host> {
        if self.hosts_by_name.contains_key(name) {
            return Err(Error::HostNameInUse(name.to_string()));
        }

        let mut seen = HashSet::new();
        for &number in vlan_numbers {
            if !seen.insert(number) {
                return Err(Error::DuplicateVlanRequested(number));
            }
        }

        // Stage every allocation before the first insert
        let host = Host::new(name);
        let mut staged: Vec<Address> = Vec::with_capacity(vlan_numbers.len());
        for &number in vlan_numbers {
            let vlan = self
                .find_vlan(&VlanSelector::Number(number))
                .ok_or(Error::UnknownVlan(number))?;
            let allocated = self.allocated_values(vlan.id);
            let value = next_free_address(vlan.network, vlan.prefix_len, &allocated)?;
            staged.push(Address::new(value, vlan.id, host.id));
        }

        // Commit host and addresses together
        self.hosts_by_name.insert(host.name.clone(), host.id);
        self.hosts.insert(host.id, host.clone());
        for address in staged {
            tracing::info!(
                host = %host.name,
                address = %address.to_dotted(),
                "Allocated address"
            );
            self.addresses.insert(address.id, address);
        }

        Ok(host)
    }

    /// Look up a host by name, exact match only
    pub fn get_host(&self, name: &str) -> Option<Host> {
        let id = *self.hosts_by_name.get(name)?;
        self.hosts.get(&id).map(|h| h.clone())
    }

    /// List all hosts, ordered by name
    pub fn list_hosts(&self) -> Vec<Host> {
        let mut hosts: Vec<Host> = self.hosts.iter().map(|h| h.clone()).collect();
        hosts.sort_by(|a, b| a.name.cmp(&b.name));
        hosts
    }

    /// Delete a host and every address it holds
    pub fn delete_host(&self, name: &str) -> Result<()> {
        let host = self
            .get_host(name)
            .ok_or_else(|| Error::HostNotFound(name.to_string()))?;

        self.addresses.retain(|_, address| address.host_id != host.id);
        self.hosts_by_name.remove(&host.name);
        self.hosts.remove(&host.id);

        tracing::info!(host = %host.name, "Deleted host");

        Ok(())
    }

    /// Numbers of the VLANs a host holds addresses in, derived and sorted
    pub fn host_vlans(&self, host_id: Uuid) -> Vec<u16> {
        let mut numbers: Vec<u16> = self
            .addresses
            .iter()
            .filter(|address| address.host_id == host_id)
            .filter_map(|address| self.vlans.get(&address.vlan_id).map(|v| v.number))
            .collect();
        numbers.sort_unstable();
        numbers
    }

    /// The host's addresses as (vlan number, value) pairs, sorted by number
    pub fn host_addresses(&self, host_id: Uuid) -> Vec<(u16, u32)> {
        let mut pairs: Vec<(u16, u32)> = self
            .addresses
            .iter()
            .filter(|address| address.host_id == host_id)
            .filter_map(|address| {
                self.vlans
                    .get(&address.vlan_id)
                    .map(|v| (v.number, address.value))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    // ==================== Query Operations ====================

    /// Resolve an allocated value to its label, `"{host}_{vlan}_ip"`
    ///
    /// If the value were ever visible in more than one VLAN the lowest VLAN
    /// number wins, keeping resolution deterministic.
    pub fn resolve_address(&self, value: u32) -> Result<String> {
        self.addresses
            .iter()
            .filter(|address| address.value == value)
            .filter_map(|address| {
                let vlan = self.vlans.get(&address.vlan_id)?;
                let host = self.hosts.get(&address.host_id)?;
                Some((vlan.number, format!("{}_{}_ip", host.name, vlan.name)))
            })
            .min_by_key(|(number, _)| *number)
            .map(|(_, label)| label)
            .ok_or_else(|| Error::AddressNotFound(format_ipv4(value)))
    }

    /// Hosts whose name contains the fragment, ordered by name
    pub fn search_hosts(&self, fragment: &str) -> Vec<Host> {
        let mut hosts: Vec<Host> = self
            .hosts
            .iter()
            .filter(|host| host.name.contains(fragment))
            .map(|h| h.clone())
            .collect();
        hosts.sort_by(|a, b| a.name.cmp(&b.name));
        hosts
    }

    // ==================== Statistics ====================

    pub fn stats(&self) -> IpamStats {
        IpamStats {
            vlans: self.vlans.len(),
            hosts: self.hosts.len(),
            addresses: self.addresses.len(),
        }
    }

    /// Values currently allocated in a VLAN
    fn allocated_values(&self, vlan_id: Uuid) -> Vec<u32> {
        self.addresses
            .iter()
            .filter(|address| address.vlan_id == vlan_id)
            .map(|address| address.value)
            .collect()
    }
}

impl Default for IpamManager {
    fn default() -> Self {
        Self::new()
    }
}
