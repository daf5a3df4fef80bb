//! IPv6 CIDR arithmetic
//!
//! Addresses are native `u128` values. Additions that leave the 128-bit space
//! fail with [`NetcalcError::Overflow`]; nothing wraps.
//!
//! # Examples
//!
//! ```
//! use netcalc_cidr::ipv6;
//!
//! assert_eq!(
//!     ipv6::to_network("2a01:7e0::abcd", 64).unwrap(),
//!     "2a01:07e0:0000:0000:0000:0000:0000:0000"
//! );
//! assert_eq!(ipv6::clean("2a01:07e0:0000:0000:0000:0000:0000:0001").unwrap(), "2a01:7e0::1");
//! ```

use crate::Distance;
use netcalc_core::parse::{self, check_prefix};
use netcalc_core::{format, AddressFamily, NetcalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// IPv6 CIDR block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Cidr {
    addr: u128,
    prefix_len: u8,
}

impl Ipv6Cidr {
    pub fn new(addr: u128, prefix_len: u8) -> Result<Self> {
        let prefix_len = check_prefix(prefix_len as u32, AddressFamily::V6)?;
        Ok(Self { addr, prefix_len })
    }

    /// Parse CIDR notation (`2a01:7e0::/32`)
    pub fn parse(text: &str) -> Result<Self> {
        let (addr, prefix_len) = parse::parse_cidr(text)?;
        Self::new(addr.into_v6()?, prefix_len)
    }

    pub fn address(&self) -> u128 {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn mask(&self) -> u128 {
        prefix_mask(self.prefix_len)
    }

    pub fn network(&self) -> u128 {
        self.addr & self.mask()
    }

    /// Highest address in the block
    pub fn last(&self) -> u128 {
        self.addr | !self.mask()
    }

    /// Number of addresses; `None` for /0, which holds 2^128
    pub fn size(&self) -> Option<u128> {
        1u128.checked_shl(128 - self.prefix_len as u32)
    }

    pub fn contains(&self, ip: u128) -> bool {
        (ip & self.mask()) == self.network()
    }
}

impl fmt::Display for Ipv6Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format::ipv6_compressed(self.addr), self.prefix_len)
    }
}

/// Everything about a block, as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Summary {
    /// Compressed form of the given address
    pub address: String,
    /// Full form of the given address
    pub fullip: String,
    /// network + 1, full form; absent for /128
    pub gateway: Option<String>,
    pub network: String,
    pub last: String,
    pub arpa: String,
    pub cidrmask: u8,
}

fn prefix_mask(prefix_len: u8) -> u128 {
    if prefix_len == 0 {
        0
    } else {
        u128::MAX << (128 - prefix_len)
    }
}

/// Address part of the text; a `/prefix` suffix is validated and ignored
fn parse_v6_address(text: &str) -> Result<u128> {
    parse::parse(text)?.address.into_v6()
}

/// Expanded form with eight zero-padded groups
pub fn full(text: &str) -> Result<String> {
    parse_v6_address(text).map(format::ipv6_full)
}

/// Expanded form as 32 hex digits with no separators
pub fn full_hex(text: &str) -> Result<String> {
    parse_v6_address(text).map(format::ipv6_hex)
}

/// Compressed form, keeping any `/prefix` suffix
pub fn clean(text: &str) -> Result<String> {
    let input = parse::parse(text)?;
    input.address.into_v6()?;
    Ok(input.to_string())
}

/// Network address in full form
pub fn to_network(text: &str, prefix_len: u8) -> Result<String> {
    let cidr = Ipv6Cidr::new(parse_v6_address(text)?, prefix_len)?;
    Ok(format::ipv6_full(cidr.network()))
}

/// First address after the network address, in full form
pub fn to_gateway(text: &str, prefix_len: u8) -> Result<String> {
    let cidr = Ipv6Cidr::new(parse_v6_address(text)?, prefix_len)?;
    offset(cidr.network(), 1).map(format::ipv6_full)
}

/// Highest address of the block, in full form
pub fn last_address(text: &str, prefix_len: u8) -> Result<String> {
    let cidr = Ipv6Cidr::new(parse_v6_address(text)?, prefix_len)?;
    Ok(format::ipv6_full(cidr.last()))
}

/// Add a signed delta, failing outside the 128-bit space
pub fn offset(addr: u128, delta: i128) -> Result<u128> {
    let shifted = if delta >= 0 {
        addr.checked_add(delta as u128)
    } else {
        addr.checked_sub(delta.unsigned_abs())
    };

    shifted.ok_or_else(|| {
        debug!(delta, "IPv6 offset leaves the address space");
        NetcalcError::Overflow(format!("{} + {}", format::ipv6_compressed(addr), delta))
    })
}

/// Add a signed delta; result in full form
///
/// # Examples
///
/// ```
/// use netcalc_cidr::ipv6;
///
/// assert_eq!(
///     ipv6::add_value("2a01:7e0::ab00", 8).unwrap(),
///     "2a01:07e0:0000:0000:0000:0000:0000:ab08"
/// );
/// ```
pub fn add_value(text: &str, delta: i128) -> Result<String> {
    offset(parse_v6_address(text)?, delta).map(format::ipv6_full)
}

/// Exact signed distance `b - a`
pub fn distance(a: &str, b: &str) -> Result<Distance> {
    let a = parse::parse_address(a)?.into_v6()?;
    let b = parse::parse_address(b)?.into_v6()?;
    Ok(Distance::between(a, b))
}

/// Reverse DNS zone for the first `prefix_len / 4` nibbles
///
/// Prefixes off a nibble boundary round down to the enclosing zone.
///
/// # Examples
///
/// ```
/// use netcalc_cidr::ipv6;
///
/// assert_eq!(
///     ipv6::arpa_zone("2a01:7e0::1", 32).unwrap(),
///     "0.e.7.0.1.0.a.2.ip6.arpa"
/// );
/// ```
pub fn arpa_zone(text: &str, prefix_len: u8) -> Result<String> {
    let addr = parse_v6_address(text)?;
    let prefix_len = check_prefix(prefix_len as u32, AddressFamily::V6)?;
    Ok(zone_name(addr, prefix_len))
}

fn zone_name(addr: u128, prefix_len: u8) -> String {
    if prefix_len % 4 != 0 {
        debug!(prefix_len, "reverse zone rounded down to a nibble boundary");
    }

    let hex = format::ipv6_hex(addr);
    let nibbles: Vec<String> = hex[..(prefix_len / 4) as usize]
        .chars()
        .rev()
        .map(String::from)
        .collect();

    if nibbles.is_empty() {
        "ip6.arpa".to_string()
    } else {
        format!("{}.ip6.arpa", nibbles.join("."))
    }
}

/// Whether an address lies in a block
///
/// Malformed input is `false`, and so is a block given as the address.
pub fn in_cidr(text: &str, cidr: &str) -> bool {
    let addr = parse::parse_address(text).and_then(|address| address.into_v6());
    let Ok(addr) = addr else {
        return false;
    };
    match Ipv6Cidr::parse(cidr) {
        Ok(cidr) => cidr.contains(addr),
        Err(_) => false,
    }
}

/// Summarize a block given as `address/prefix`
pub fn calculate(text: &str) -> Result<Ipv6Summary> {
    let cidr = Ipv6Cidr::parse(text)?;
    let addr = cidr.address();
    let prefix_len = cidr.prefix_len();

    let gateway = if prefix_len < 128 {
        Some(format::ipv6_full(offset(cidr.network(), 1)?))
    } else {
        None
    };

    Ok(Ipv6Summary {
        address: format::ipv6_compressed(addr),
        fullip: format::ipv6_full(addr),
        gateway,
        network: format::ipv6_full(cidr.network()),
        last: format::ipv6_full(cidr.last()),
        arpa: zone_name(addr, prefix_len),
        cidrmask: prefix_len,
    })
}

/// Embedded IPv4 address of an IPv4-mapped address (`::ffff:a.b.c.d`)
pub fn to_ipv4(text: &str) -> Result<String> {
    let addr = parse::parse_address(text)?.into_v6()?;
    if addr >> 32 != 0xffff {
        return Err(NetcalcError::InvalidAddress(format!(
            "{} is not an IPv4-mapped address",
            text
        )));
    }
    Ok(format::ipv4(addr as u32))
}
