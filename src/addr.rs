//! IPv4 address codec
//!
//! Conversions between dotted-quad text and 32-bit integers, plus the CIDR
//! mask arithmetic used by the allocator. Addresses are held as `u32` in
//! network (big-endian) order throughout the crate.

use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static IPV4_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$").unwrap());

/// Check whether text is four dot-separated groups of 1-3 digits.
///
/// Purely syntactic: `999.1.1.1` passes here and is only rejected by
/// [`parse_ipv4`], which range-checks each octet.
pub fn is_valid_ipv4(text: &str) -> bool {
    IPV4_PATTERN.is_match(text)
}

/// Parse a dotted-quad address into its 32-bit integer value.
///
/// Rejects both syntactically malformed text and octets above 255; octets
/// are never wrapped or truncated.
pub fn parse_ipv4(text: &str) -> Result<u32> {
    if !is_valid_ipv4(text) {
        return Err(Error::InvalidAddress(text.to_string()));
    }

    let mut value: u32 = 0;
    for group in text.split('.') {
        let octet: u32 = group
            .parse()
            .map_err(|_| Error::InvalidAddress(text.to_string()))?;
        if octet > 255 {
            return Err(Error::InvalidAddress(text.to_string()));
        }
        value = (value << 8) + octet;
    }
    Ok(value)
}

/// Format a 32-bit integer as a dotted-quad address.
///
/// Total inverse of [`parse_ipv4`]: defined for every `u32`.
pub fn format_ipv4(value: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        value >> 24,
        (value >> 16) & 0xff,
        (value >> 8) & 0xff,
        value & 0xff
    )
}

/// Network mask for a prefix length: `prefix_len` ones followed by zeros.
pub fn cidr_mask(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        n => (!0u32) << (32 - u32::from(n)),
    }
}

/// Host-bits mask for a prefix length: complement of [`cidr_mask`].
pub fn host_mask(prefix_len: u8) -> u32 {
    !cidr_mask(prefix_len)
}

/// Parse `"A.B.C.D/N"` into the block's network address and prefix length.
///
/// The address part may be any address inside the block; the host bits are
/// masked off.
pub fn parse_cidr(text: &str) -> Result<(u32, u8)> {
    let (addr, prefix) = text
        .split_once('/')
        .ok_or_else(|| Error::InvalidCidr(text.to_string()))?;

    let addr = parse_ipv4(addr).map_err(|_| Error::InvalidCidr(text.to_string()))?;
    let prefix_len: u8 = prefix
        .parse()
        .map_err(|_| Error::InvalidCidr(text.to_string()))?;
    if prefix_len > 32 {
        return Err(Error::InvalidCidr(text.to_string()));
    }

    Ok((addr & cidr_mask(prefix_len), prefix_len))
}

/// Network address of a CIDR block given as text.
pub fn mask_from_cidr(text: &str) -> Result<u32> {
    parse_cidr(text).map(|(network, _)| network)
}
