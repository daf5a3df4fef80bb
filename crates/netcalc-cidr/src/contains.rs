//! Address-in-network and network-in-network predicates
//!
//! Operands of different families never match.

use crate::{Ipv4Cidr, Ipv6Cidr};
use netcalc_core::parse::{parse_address, parse_cidr};
use netcalc_core::{Address, NetcalcError, Result};
use tracing::{debug, trace};

/// Whether `address` lies inside `cidr`
///
/// Malformed input is `false`, and so is a block given as the address.
///
/// # Examples
///
/// ```
/// use netcalc_cidr::contains::address_in_cidr;
///
/// assert!(address_in_cidr("192.168.1.10", "192.168.1.0/24"));
/// assert!(!address_in_cidr("192.168.1.10", "2a01:7e0::/32"));
/// ```
pub fn address_in_cidr(address: &str, cidr: &str) -> bool {
    match parse_address(address) {
        Ok(address) => contains(address, cidr),
        Err(_) => false,
    }
}

/// Whether `address` lies inside any of `cidrs`; stops at the first match
///
/// # Examples
///
/// ```
/// use netcalc_cidr::contains::address_in_any;
///
/// let nets = ["10.0.0.0/8", "192.168.0.0/16"];
/// assert!(address_in_any("192.168.5.5", &nets));
/// assert!(!address_in_any("172.16.0.1", &nets));
/// ```
pub fn address_in_any<I>(address: &str, cidrs: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let Ok(address) = parse_address(address) else {
        return false;
    };
    cidrs
        .into_iter()
        .any(|cidr| contains(address, cidr.as_ref()))
}

fn contains(address: Address, cidr: &str) -> bool {
    let Ok((network, prefix_len)) = parse_cidr(cidr) else {
        return false;
    };

    match (address, network) {
        (Address::V4(ip), Address::V4(net)) => Ipv4Cidr::new(net, prefix_len)
            .map(|block| block.contains(ip))
            .unwrap_or(false),
        (Address::V6(ip), Address::V6(net)) => Ipv6Cidr::new(net, prefix_len)
            .map(|block| block.contains(ip))
            .unwrap_or(false),
        _ => {
            trace!(cidr, "family mismatch in containment test");
            false
        }
    }
}

/// Whether the whole `inner` block lies inside `outer`
///
/// Only IPv4 is implemented; two IPv6 blocks give
/// [`NetcalcError::Unsupported`]. Mixed families are `Ok(false)`.
///
/// # Examples
///
/// ```
/// use netcalc_cidr::contains::cidr_in_cidr;
///
/// assert!(cidr_in_cidr("10.0.0.0/8", "10.20.0.0/16").unwrap());
/// assert!(!cidr_in_cidr("10.20.0.0/16", "10.0.0.0/8").unwrap());
/// assert!(cidr_in_cidr("2a01::/16", "2a01:7e0::/32").is_err());
/// ```
pub fn cidr_in_cidr(outer: &str, inner: &str) -> Result<bool> {
    let (outer_addr, outer_prefix) = parse_cidr(outer)?;
    let (inner_addr, inner_prefix) = parse_cidr(inner)?;

    match (outer_addr, inner_addr) {
        (Address::V4(outer_net), Address::V4(inner_net)) => {
            let outer = Ipv4Cidr::new(outer_net, outer_prefix)?;
            let inner = Ipv4Cidr::new(inner_net, inner_prefix)?;
            Ok(outer.contains_cidr(&inner))
        }
        (Address::V6(_), Address::V6(_)) => {
            debug!(outer, inner, "IPv6 network-in-network containment requested");
            Err(NetcalcError::Unsupported(
                "network-in-network containment for IPv6".to_string(),
            ))
        }
        _ => Ok(false),
    }
}
