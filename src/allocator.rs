//! Address allocation within a VLAN's CIDR block
//!
//! Finds the lowest free host-address in a block. The engine is pure: it
//! reads the allocated set it is handed and returns a candidate, and the
//! caller is responsible for persisting the result inside the same unit of
//! work that produced the set.

use crate::addr::{format_ipv4, host_mask};
use crate::{Error, Result};
use std::collections::BTreeSet;

/// Compute the next free address in the block `network/prefix_len`.
///
/// Every allocated value is projected onto the block's host bits, and
/// offsets `0 .. 2^(32 - prefix_len)` are scanned in ascending order; the
/// first offset missing from the projection is returned as a full address.
/// The scan is deterministic: the same allocated set always yields the same
/// candidate.
///
/// Returns [`Error::PoolExhausted`] when every offset is taken, carrying the
/// block and the allocated count for diagnostics.
pub fn next_free_address(network: u32, prefix_len: u8, allocated: &[u32]) -> Result<u32> {
    let hosts = host_mask(prefix_len);
    let taken: BTreeSet<u32> = allocated.iter().map(|value| value & hosts).collect();

    // Offset count is 2^32 for a /0 block, so count in u64
    let block_size = 1u64 << (32 - u32::from(prefix_len));
    for offset in 0..block_size {
        let offset = offset as u32;
        if !taken.contains(&offset) {
            return Ok(network | offset);
        }
    }

    Err(Error::PoolExhausted {
        cidr: format!("{}/{}", format_ipv4(network), prefix_len),
        allocated: allocated.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::parse_ipv4;

    #[test]
    fn test_empty_block_yields_network_address() {
        let network = parse_ipv4("10.11.12.0").unwrap();
        assert_eq!(next_free_address(network, 24, &[]).unwrap(), network);
    }

    #[test]
    fn test_sequential_allocation() {
        let network = parse_ipv4("10.11.12.0").unwrap();
        let mut allocated = Vec::new();

        for offset in 0..4 {
            let value = next_free_address(network, 24, &allocated).unwrap();
            assert_eq!(value, network + offset);
            allocated.push(value);
        }
    }

    #[test]
    fn test_lowest_gap_is_filled_first() {
        let network = parse_ipv4("10.11.12.0").unwrap();
        let allocated = vec![network, network + 1, network + 3];

        assert_eq!(
            next_free_address(network, 24, &allocated).unwrap(),
            network + 2
        );
    }

    #[test]
    fn test_allocated_values_are_projected_to_host_bits() {
        // Values from a different block still count through their host bits
        let network = parse_ipv4("10.11.12.0").unwrap();
        let foreign = parse_ipv4("192.168.7.0").unwrap();

        assert_eq!(
            next_free_address(network, 24, &[foreign]).unwrap(),
            network + 1
        );
    }

    #[test]
    fn test_slash_31_exhausts_after_two() {
        let network = parse_ipv4("10.10.10.126").unwrap();
        let first = next_free_address(network, 31, &[]).unwrap();
        let second = next_free_address(network, 31, &[first]).unwrap();
        assert_eq!(first, network);
        assert_eq!(second, network + 1);

        let err = next_free_address(network, 31, &[first, second]).unwrap_err();
        assert_eq!(
            err,
            Error::PoolExhausted {
                cidr: "10.10.10.126/31".to_string(),
                allocated: 2,
            }
        );
    }

    #[test]
    fn test_slash_32_has_a_single_address() {
        let network = parse_ipv4("10.0.0.1").unwrap();
        assert_eq!(next_free_address(network, 32, &[]).unwrap(), network);

        let err = next_free_address(network, 32, &[network]).unwrap_err();
        assert!(matches!(err, Error::PoolExhausted { allocated: 1, .. }));
    }
}
