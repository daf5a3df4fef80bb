//! IPv4 and IPv6 CIDR arithmetic
//!
//! Provides pure, stateless calculations on textual addresses:
//! - Network, broadcast / last address and host ranges ([`ipv4`], [`ipv6`])
//! - Netmask and prefix conversions
//! - Containment tests ([`contains`])
//! - Signed distances and offsets
//! - Reverse DNS zone names
//! - Largest free aligned IPv4 subnet between two bounds
//!
//! The functions at the crate root dispatch on the address family of their
//! input.
//!
//! # Examples
//!
//! ```
//! use netcalc_cidr::{canonicalize, distance, Ipv4Cidr};
//!
//! let cidr = Ipv4Cidr::parse("192.168.1.0/24").unwrap();
//! assert_eq!(cidr.prefix_len(), 24);
//! assert_eq!(cidr.network(), 0xC0A80100); // 192.168.1.0
//! assert!(cidr.contains(0xC0A80101)); // 192.168.1.1
//!
//! assert_eq!(canonicalize("2a01:07e0::0001", 0).unwrap(), "2a01:7e0::1");
//! assert_eq!(canonicalize("10.0.0.0/24", 10).unwrap(), "10.0.0.10/24");
//! assert_eq!(distance("10.0.0.1", "10.0.0.10").unwrap().to_i64(), Some(9));
//! ```

use netcalc_core::parse::{parse, parse_address, parse_cidr};
use netcalc_core::{format, Address, NetcalcError, ParsedInput, Result};
use serde::{Deserialize, Serialize};

pub mod contains;
pub mod distance;
pub mod ipv4;
pub mod ipv6;

pub use contains::{address_in_any, address_in_cidr, cidr_in_cidr};
pub use distance::Distance;
pub use ipv4::{Ipv4Cidr, Ipv4Summary, NextSubnet};
pub use ipv6::{Ipv6Cidr, Ipv6Summary};

/// Result of [`calculate`], tagged by family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family")]
pub enum Calculation {
    #[serde(rename = "ipv4")]
    V4(Ipv4Summary),
    #[serde(rename = "ipv6")]
    V6(Ipv6Summary),
}

/// Canonical text of an address, moved by `offset`
///
/// IPv4 renders as dotted decimal, IPv6 compressed; a `/prefix` suffix is
/// kept. Moving outside the family's address space is an overflow error.
pub fn canonicalize(text: &str, offset: i128) -> Result<String> {
    let input = parse(text)?;

    let address = match input.address {
        Address::V4(addr) => {
            let delta = i64::try_from(offset).map_err(|_| {
                NetcalcError::Overflow(format!("{} + {}", format::ipv4(addr), offset))
            })?;
            Address::V4(ipv4::offset(addr, delta)?)
        }
        Address::V6(addr) => Address::V6(ipv6::offset(addr, offset)?),
    };

    Ok(ParsedInput { address, ..input }.to_string())
}

/// Signed distance `b - a` between two addresses of the same family
pub fn distance(a: &str, b: &str) -> Result<Distance> {
    match (parse_address(a)?, parse_address(b)?) {
        (Address::V4(a), Address::V4(b)) => Ok(Distance::between(a as u128, b as u128)),
        (Address::V6(a), Address::V6(b)) => Ok(Distance::between(a, b)),
        (a, b) => Err(NetcalcError::FamilyMismatch {
            expected: a.family(),
            found: b.family(),
        }),
    }
}

/// Network address of a block, keeping the suffix (`212.224.70.0/24`)
///
/// IPv6 networks are rendered in full form.
pub fn network_of(cidr: &str) -> Result<String> {
    match parse_cidr(cidr)? {
        (Address::V4(addr), prefix_len) => {
            let block = Ipv4Cidr::new(addr, prefix_len)?;
            Ok(format!("{}/{}", format::ipv4(block.network()), prefix_len))
        }
        (Address::V6(addr), prefix_len) => {
            let block = Ipv6Cidr::new(addr, prefix_len)?;
            Ok(format!("{}/{}", format::ipv6_full(block.network()), prefix_len))
        }
    }
}

/// Broadcast (IPv4) or last (IPv6) address of a block, keeping the suffix
pub fn last_address_of(cidr: &str) -> Result<String> {
    match parse_cidr(cidr)? {
        (Address::V4(addr), prefix_len) => {
            let block = Ipv4Cidr::new(addr, prefix_len)?;
            Ok(format!("{}/{}", format::ipv4(block.broadcast()), prefix_len))
        }
        (Address::V6(addr), prefix_len) => {
            let block = Ipv6Cidr::new(addr, prefix_len)?;
            Ok(format!("{}/{}", format::ipv6_full(block.last()), prefix_len))
        }
    }
}

/// Summarize a block of either family
///
/// # Examples
///
/// ```
/// use netcalc_cidr::{calculate, Calculation};
///
/// match calculate("2a01:7e0::1/64").unwrap() {
///     Calculation::V6(summary) => assert_eq!(summary.cidrmask, 64),
///     Calculation::V4(_) => unreachable!(),
/// }
/// ```
pub fn calculate(text: &str) -> Result<Calculation> {
    match parse(text)?.address {
        Address::V4(_) => ipv4::calculate(text).map(Calculation::V4),
        Address::V6(_) => ipv6::calculate(text).map(Calculation::V6),
    }
}

/// Reverse DNS zone of an address or block of either family
///
/// IPv6 uses the prefix from the text, or /128 for a bare address.
pub fn reverse_zone(text: &str) -> Result<String> {
    let input = parse(text)?;
    match input.address {
        Address::V4(_) => ipv4::to_arpa(text),
        Address::V6(_) => ipv6::arpa_zone(text, input.prefix_or_host()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcalc_core::AddressFamily;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("192.168.000.001", 0).unwrap(), "192.168.0.1");
        assert_eq!(canonicalize("212.224.70.0/24", 9).unwrap(), "212.224.70.9/24");
        assert_eq!(
            canonicalize("2a01:07e0:0000:0000:0000:0000:0000:0001", 0).unwrap(),
            "2a01:7e0::1"
        );
        assert_eq!(canonicalize("2a01:7e0::/64", 255).unwrap(), "2a01:7e0::ff/64");
    }

    #[test]
    fn test_canonicalize_errors() {
        assert!(canonicalize("not-an-ip", 0).is_err());
        assert!(canonicalize("10.0.0.0/33", 0).is_err());
        assert!(matches!(
            canonicalize("255.255.255.255", 1),
            Err(NetcalcError::Overflow(_))
        ));
        assert!(matches!(
            canonicalize("::", -1),
            Err(NetcalcError::Overflow(_))
        ));
        assert!(canonicalize("0.0.0.0", i128::MAX).is_err());
    }

    #[test]
    fn test_canonicalize_ipv4_offset_bounds() {
        assert_eq!(
            canonicalize("0.0.0.0", u32::MAX as i128).unwrap(),
            "255.255.255.255"
        );
        assert_eq!(
            canonicalize("255.255.255.255/0", -(u32::MAX as i128)).unwrap(),
            "0.0.0.0/0"
        );
        assert!(matches!(
            canonicalize("10.0.0.0", i64::MAX as i128 + 1),
            Err(NetcalcError::Overflow(_))
        ));
        assert!(matches!(
            canonicalize("10.0.0.0", i64::MAX as i128),
            Err(NetcalcError::Overflow(_))
        ));
        assert!(matches!(
            canonicalize("10.0.0.0", i64::MIN as i128),
            Err(NetcalcError::Overflow(_))
        ));
    }

    #[test]
    fn test_distance_dispatch() {
        assert_eq!(distance("10.0.0.10", "10.0.0.1").unwrap().to_i64(), Some(-9));
        assert_eq!(distance("::1", "::ff").unwrap().to_i64(), Some(254));
        assert_eq!(
            distance("10.0.0.1", "::1"),
            Err(NetcalcError::FamilyMismatch {
                expected: AddressFamily::V4,
                found: AddressFamily::V6
            })
        );
    }

    #[test]
    fn test_network_of() {
        assert_eq!(network_of("212.224.70.222/24").unwrap(), "212.224.70.0/24");
        assert_eq!(
            network_of("2a01:7e0::abcd/64").unwrap(),
            "2a01:07e0:0000:0000:0000:0000:0000:0000/64"
        );
        assert!(network_of("212.224.70.222").is_err());
    }

    #[test]
    fn test_last_address_of() {
        assert_eq!(last_address_of("212.224.70.222/24").unwrap(), "212.224.70.255/24");
        assert_eq!(
            last_address_of("2a01:7e0::abcd/120").unwrap(),
            "2a01:07e0:0000:0000:0000:0000:0000:abff/120"
        );
    }

    #[test]
    fn test_calculate_dispatch() {
        assert!(matches!(
            calculate("212.224.70.222/24").unwrap(),
            Calculation::V4(_)
        ));
        assert!(matches!(
            calculate("2a01:7e0::1/64").unwrap(),
            Calculation::V6(_)
        ));
        assert!(calculate("garbage").is_err());
    }

    #[test]
    fn test_calculation_serialization() {
        let calc = calculate("10.0.0.1/30").unwrap();
        let json = serde_json::to_value(&calc).expect("serialization failed");
        assert_eq!(json["family"], "ipv4");
        assert_eq!(json["network"], "10.0.0.0");
        assert_eq!(json["hostcount"], 2);
    }

    #[test]
    fn test_reverse_zone_dispatch() {
        assert_eq!(
            reverse_zone("212.224.70.0/25").unwrap(),
            "0-127.70.224.212.in-addr.arpa"
        );
        assert_eq!(
            reverse_zone("2a01:7e0::/32").unwrap(),
            "0.e.7.0.1.0.a.2.ip6.arpa"
        );
        assert!(reverse_zone("212.224.0.0/16").is_err());
    }
}
