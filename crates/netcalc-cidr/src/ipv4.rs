//! IPv4 CIDR arithmetic
//!
//! All computation happens on `u32` values:
//! - network / broadcast derivation and mask conversions
//! - full block summaries ([`calculate`])
//! - offsets, distances and enumeration
//! - reverse zones, including RFC 2317 classless delegation
//! - the largest aligned subnet between two bounds ([`find_next_subnet`])
//!
//! # Examples
//!
//! ```
//! use netcalc_cidr::ipv4;
//!
//! let summary = ipv4::calculate("212.224.70.222/24").unwrap();
//! assert_eq!(summary.network, "212.224.70.0");
//! assert_eq!(summary.broadcast, "212.224.70.255");
//! assert_eq!(summary.hostcount, 254);
//! ```

use netcalc_core::parse::{self, check_prefix};
use netcalc_core::{format, Address, AddressFamily, NetcalcError, ParsedInput, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Shortest prefix [`list_addresses`] will enumerate (4096 addresses)
pub const LIST_MIN_PREFIX: u8 = 20;

/// IPv4 CIDR block
///
/// Keeps the address it was built from; the network and broadcast are
/// derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    /// Address as given (not necessarily the network address)
    addr: u32,
    /// Prefix length (0-32)
    prefix_len: u8,
}

impl Ipv4Cidr {
    /// Create a block from an address and prefix length
    pub fn new(addr: u32, prefix_len: u8) -> Result<Self> {
        let prefix_len = check_prefix(prefix_len as u32, AddressFamily::V4)?;
        Ok(Self { addr, prefix_len })
    }

    /// Parse CIDR notation (`x.x.x.x/prefix`)
    ///
    /// # Examples
    ///
    /// ```
    /// use netcalc_cidr::Ipv4Cidr;
    ///
    /// let cidr = Ipv4Cidr::parse("10.0.0.0/8").unwrap();
    /// assert_eq!(cidr.prefix_len(), 8);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let (addr, prefix_len) = parse::parse_cidr(text)?;
        Self::new(addr.into_v4()?, prefix_len)
    }

    pub fn address(&self) -> u32 {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Network mask
    pub fn mask(&self) -> u32 {
        prefix_mask(self.prefix_len)
    }

    /// Network address (all host bits zero)
    pub fn network(&self) -> u32 {
        self.addr & self.mask()
    }

    /// Broadcast address (all host bits one)
    pub fn broadcast(&self) -> u32 {
        self.addr | !self.mask()
    }

    /// Total number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.prefix_len)
    }

    /// Check if an address is in this block
    pub fn contains(&self, ip: u32) -> bool {
        (ip & self.mask()) == self.network()
    }

    /// Check if another block lies entirely inside this one
    pub fn contains_cidr(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other.network()) && self.contains(other.broadcast())
    }

    /// Iterate over every address from network to broadcast
    ///
    /// Note: this does not apply the [`LIST_MIN_PREFIX`] bound; use
    /// [`list_addresses`] for untrusted input.
    pub fn iter(&self) -> Ipv4Iter {
        Ipv4Iter::new(*self)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format::ipv4(self.addr), self.prefix_len)
    }
}

/// Iterator over the addresses of an [`Ipv4Cidr`]
pub struct Ipv4Iter {
    current: u64,
    end: u64,
}

impl Ipv4Iter {
    fn new(cidr: Ipv4Cidr) -> Self {
        Self {
            current: cidr.network() as u64,
            end: cidr.broadcast() as u64,
        }
    }
}

impl Iterator for Ipv4Iter {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current <= self.end {
            let ip = self.current as u32;
            self.current += 1;
            Some(ip)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end + 1).saturating_sub(self.current);
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            // a /0 holds 2^32 addresses, more than a 32-bit usize
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Everything about a block, as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv4Summary {
    pub address: String,
    /// network + 1; absent for /31 and /32
    pub gateway: Option<String>,
    pub netmask: String,
    pub cidrmask: u8,
    pub network: String,
    /// network + 2; absent for /31 and /32
    pub hostmin: Option<String>,
    /// broadcast - 1; absent for /31 and /32
    pub hostmax: Option<String>,
    pub broadcast: String,
    /// Addresses minus network and broadcast
    pub hostcount: u64,
}

/// Prefix length as a mask; `prefix_len` must be at most 32
fn prefix_mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len)
    }
}

fn parse_v4(text: &str) -> Result<(u32, Option<u8>)> {
    let input = parse::parse(text)?;
    Ok((input.address.into_v4()?, input.prefix))
}

fn parse_v4_address(text: &str) -> Result<u32> {
    parse::parse_address(text)?.into_v4()
}

/// Network address of `addr` under `prefix_len`
pub fn to_network(addr: u32, prefix_len: u8) -> Result<u32> {
    Ok(Ipv4Cidr::new(addr, prefix_len)?.network())
}

/// Broadcast address of `addr` under `prefix_len`
pub fn to_broadcast(addr: u32, prefix_len: u8) -> Result<u32> {
    Ok(Ipv4Cidr::new(addr, prefix_len)?.broadcast())
}

/// Convert a prefix length to a netmask
///
/// Only prefixes 1-32 are accepted; /0 is rejected.
///
/// # Examples
///
/// ```
/// use netcalc_cidr::ipv4;
///
/// assert_eq!(ipv4::cidr_to_mask(24).unwrap(), 0xFFFFFF00);
/// assert!(ipv4::cidr_to_mask(0).is_err());
/// ```
pub fn cidr_to_mask(prefix_len: u8) -> Result<u32> {
    if prefix_len == 0 || prefix_len > 32 {
        return Err(NetcalcError::InvalidPrefixLength {
            family: AddressFamily::V4,
            prefix: prefix_len as u32,
        });
    }
    Ok(prefix_mask(prefix_len))
}

/// [`cidr_to_mask`] rendered as dotted decimal
pub fn cidr_to_netmask(prefix_len: u8) -> Result<String> {
    cidr_to_mask(prefix_len).map(format::ipv4)
}

/// Count the leading run of one-bits in a mask
pub fn mask_to_cidr(mask: u32) -> u8 {
    mask.leading_ones() as u8
}

/// [`mask_to_cidr`] for a dotted-decimal netmask
pub fn netmask_to_cidr(netmask: &str) -> Result<u8> {
    parse_v4_address(netmask).map(mask_to_cidr)
}

/// Summarize a block given as `x.x.x.x/prefix`
///
/// A bare address is treated as /32.
pub fn calculate(text: &str) -> Result<Ipv4Summary> {
    let (addr, prefix) = parse_v4(text)?;
    let cidr = Ipv4Cidr::new(addr, prefix.unwrap_or(32))?;
    let network = cidr.network();
    let broadcast = cidr.broadcast();
    let has_hosts = cidr.prefix_len() <= 30;

    let host = |value: u32| has_hosts.then(|| format::ipv4(value));

    Ok(Ipv4Summary {
        address: format::ipv4(addr),
        gateway: host(network.wrapping_add(1)),
        netmask: format::ipv4(cidr.mask()),
        cidrmask: cidr.prefix_len(),
        network: format::ipv4(network),
        hostmin: host(network.wrapping_add(2)),
        hostmax: host(broadcast.wrapping_sub(1)),
        broadcast: format::ipv4(broadcast),
        hostcount: cidr.size().saturating_sub(2),
    })
}

/// Number of addresses in a block, network and broadcast included
pub fn address_count(text: &str) -> Result<u64> {
    let (addr, prefix) = parse_v4(text)?;
    Ok(Ipv4Cidr::new(addr, prefix.unwrap_or(32))?.size())
}

/// Signed distance `b - a`
pub fn distance(a: &str, b: &str) -> Result<i64> {
    let a = parse_v4_address(a)?;
    let b = parse_v4_address(b)?;
    Ok(b as i64 - a as i64)
}

/// Add `delta` to an address, failing outside 0.0.0.0 - 255.255.255.255
pub fn offset(addr: u32, delta: i64) -> Result<u32> {
    (addr as i64)
        .checked_add(delta)
        .and_then(|shifted| u32::try_from(shifted).ok())
        .ok_or_else(|| {
            debug!(addr, delta, "IPv4 offset leaves the address space");
            NetcalcError::Overflow(format!("{} + {}", format::ipv4(addr), delta))
        })
}

/// Add `delta` to an address, keeping any `/prefix` suffix
///
/// # Examples
///
/// ```
/// use netcalc_cidr::ipv4;
///
/// assert_eq!(ipv4::add_value("10.0.0.0/24", 10).unwrap(), "10.0.0.10/24");
/// assert_eq!(ipv4::add_value("10.0.1.0", -1).unwrap(), "10.0.0.255");
/// ```
pub fn add_value(text: &str, delta: i64) -> Result<String> {
    let (addr, prefix) = parse_v4(text)?;
    let shifted = ParsedInput {
        address: Address::V4(offset(addr, delta)?),
        prefix,
    };
    Ok(shifted.to_string())
}

/// Canonical dotted-decimal form, keeping any `/prefix` suffix
pub fn clean(text: &str) -> Result<String> {
    add_value(text, 0)
}

/// Every address from network to broadcast
///
/// Blocks shorter than /20 are refused before anything is allocated.
pub fn list_addresses(text: &str) -> Result<Vec<String>> {
    let (addr, prefix) = parse_v4(text)?;
    let prefix = prefix.unwrap_or(32);
    if prefix < LIST_MIN_PREFIX {
        debug!(prefix, "refusing to enumerate block");
        return Err(NetcalcError::RangeTooLarge(prefix));
    }

    let cidr = Ipv4Cidr::new(addr, prefix)?;
    Ok(cidr.iter().map(format::ipv4).collect())
}

/// `c.b.a.in-addr.arpa` for the /24 containing `addr`
fn zone24(addr: u32) -> String {
    let [a, b, c, _] = addr.to_be_bytes();
    format!("{}.{}.{}.in-addr.arpa", c, b, a)
}

/// Reverse DNS zone of an address or block
///
/// - bare address: its /24 zone
/// - /24: the /24 zone
/// - /25 to /32: RFC 2317 zone `min-max.c.b.a.in-addr.arpa`
/// - shorter than /24: unsupported
///
/// # Examples
///
/// ```
/// use netcalc_cidr::ipv4;
///
/// assert_eq!(ipv4::to_arpa("212.224.70.0/24").unwrap(), "70.224.212.in-addr.arpa");
/// assert_eq!(ipv4::to_arpa("212.224.70.0/25").unwrap(), "0-127.70.224.212.in-addr.arpa");
/// ```
pub fn to_arpa(text: &str) -> Result<String> {
    let (addr, prefix) = parse_v4(text)?;

    match prefix {
        None => Ok(zone24(addr)),
        Some(prefix) if prefix < 24 => {
            debug!(prefix, "no classless reverse zone for supernets");
            Err(NetcalcError::Unsupported(format!(
                "IPv4 reverse zone for /{} (only /24 to /32)",
                prefix
            )))
        }
        Some(24) => Ok(zone24(addr)),
        Some(prefix) => {
            let cidr = Ipv4Cidr::new(addr, prefix)?;
            Ok(format!(
                "{}-{}.{}",
                cidr.network() & 0xFF,
                cidr.broadcast() & 0xFF,
                zone24(cidr.network())
            ))
        }
    }
}

/// Largest aligned block starting at a lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSubnet {
    /// Network address (the lower bound)
    pub network: u32,
    pub prefix_len: u8,
    /// Last address of the block
    pub broadcast: u32,
}

impl fmt::Display for NextSubnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format::ipv4(self.network), self.prefix_len)
    }
}

/// Largest block whose network is `lower` and whose broadcast is at most `upper`
///
/// The host part is widened one bit at a time from /32. Widening stops as
/// soon as the trial network moves off `lower` or the trial broadcast passes
/// `upper`; the last width that fit wins. `None` when `lower > upper`.
pub fn next_subnet(lower: u32, upper: u32) -> Option<NextSubnet> {
    let mut fitting = None;

    for width in 0..=32u32 {
        let host_mask = if width == 32 {
            u32::MAX
        } else {
            (1u32 << width) - 1
        };
        let network = lower & !host_mask;
        let broadcast = network | host_mask;

        if network != lower || broadcast > upper {
            break;
        }

        fitting = Some(NextSubnet {
            network,
            prefix_len: (32 - width) as u8,
            broadcast,
        });
    }

    fitting
}

/// [`next_subnet`] on text; `upper` defaults to 255.255.255.255
///
/// # Examples
///
/// ```
/// use netcalc_cidr::ipv4;
///
/// let next = ipv4::find_next_subnet("10.0.0.64", Some("10.0.0.127")).unwrap().unwrap();
/// assert_eq!(next.prefix_len, 26);
/// ```
pub fn find_next_subnet(lower: &str, upper: Option<&str>) -> Result<Option<NextSubnet>> {
    let lower = parse_v4_address(lower)?;
    let upper = match upper {
        Some(upper) => parse_v4_address(upper)?,
        None => u32::MAX,
    };
    Ok(next_subnet(lower, upper))
}

/// IPv4-mapped IPv6 form (`::ffff:a.b.c.d`)
pub fn to_ipv6_mapped(text: &str) -> Result<String> {
    let addr = parse_v4_address(text)?;
    Ok(format!("::ffff:{}", format::ipv4(addr)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr() {
        let cidr = Ipv4Cidr::parse("192.168.1.0/24").unwrap();
        assert_eq!(cidr.network(), 0xC0A80100);
        assert_eq!(cidr.prefix_len(), 24);
    }

    #[test]
    fn test_parse_invalid_cidr() {
        assert!(Ipv4Cidr::parse("192.168.1.0").is_err());
        assert!(Ipv4Cidr::parse("192.168.1.0/33").is_err());
        assert!(Ipv4Cidr::parse("256.0.0.0/24").is_err());
        assert!(matches!(
            Ipv4Cidr::parse("2a01::/64"),
            Err(NetcalcError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_cidr_keeps_host_address() {
        let cidr = Ipv4Cidr::parse("212.224.70.222/24").unwrap();
        assert_eq!(cidr.address(), 0xD4E046DE);
        assert_eq!(cidr.network(), 0xD4E04600);
        assert_eq!(cidr.to_string(), "212.224.70.222/24");
    }

    #[test]
    fn test_cidr_contains() {
        let cidr = Ipv4Cidr::parse("192.168.1.0/24").unwrap();
        assert!(cidr.contains(0xC0A80100));
        assert!(cidr.contains(0xC0A801FF));
        assert!(!cidr.contains(0xC0A80001));
        assert!(!cidr.contains(0xC0A80200));
    }

    #[test]
    fn test_cidr_size() {
        assert_eq!(Ipv4Cidr::parse("192.168.1.0/24").unwrap().size(), 256);
        assert_eq!(Ipv4Cidr::parse("10.0.0.0/8").unwrap().size(), 16777216);
        assert_eq!(Ipv4Cidr::parse("0.0.0.0/0").unwrap().size(), 1u64 << 32);
        assert_eq!(Ipv4Cidr::parse("10.0.0.1/32").unwrap().size(), 1);
    }

    #[test]
    fn test_iterator_small() {
        let cidr = Ipv4Cidr::parse("192.168.1.0/30").unwrap();
        let ips: Vec<u32> = cidr.iter().collect();
        assert_eq!(ips, vec![0xC0A80100, 0xC0A80101, 0xC0A80102, 0xC0A80103]);
    }

    #[test]
    fn test_iterator_size_hint() {
        let mut iter = Ipv4Cidr::parse("192.168.1.0/30").unwrap().iter();
        assert_eq!(iter.size_hint(), (4, Some(4)));
        iter.next();
        assert_eq!(iter.size_hint(), (3, Some(3)));

        let whole = Ipv4Cidr::parse("0.0.0.0/0").unwrap().iter();
        let (lower, upper) = whole.size_hint();
        match usize::try_from(1u64 << 32) {
            Ok(expected) => assert_eq!((lower, upper), (expected, Some(expected))),
            Err(_) => assert_eq!((lower, upper), (usize::MAX, None)),
        }
    }

    #[test]
    fn test_iterator_top_of_space() {
        let cidr = Ipv4Cidr::parse("255.255.255.254/31").unwrap();
        let ips: Vec<u32> = cidr.iter().collect();
        assert_eq!(ips, vec![0xFFFFFFFE, 0xFFFFFFFF]);
    }

    #[test]
    fn test_network_and_broadcast() {
        assert_eq!(to_network(0xD4E046DE, 24).unwrap(), 0xD4E04600);
        assert_eq!(to_broadcast(0xD4E046DE, 24).unwrap(), 0xD4E046FF);
        assert_eq!(to_network(0xD4E046DE, 0).unwrap(), 0);
        assert_eq!(to_broadcast(0xD4E046DE, 0).unwrap(), u32::MAX);
        assert_eq!(to_network(0xD4E046DE, 32).unwrap(), 0xD4E046DE);
        assert!(to_network(0, 33).is_err());
    }

    #[test]
    fn test_cidr_to_mask() {
        assert_eq!(cidr_to_netmask(24).unwrap(), "255.255.255.0");
        assert_eq!(cidr_to_netmask(32).unwrap(), "255.255.255.255");
        assert_eq!(cidr_to_netmask(1).unwrap(), "128.0.0.0");
        assert!(cidr_to_mask(0).is_err());
        assert!(cidr_to_mask(33).is_err());
    }

    #[test]
    fn test_mask_to_cidr() {
        assert_eq!(netmask_to_cidr("255.255.255.0").unwrap(), 24);
        assert_eq!(netmask_to_cidr("255.255.255.255").unwrap(), 32);
        assert_eq!(netmask_to_cidr("0.0.0.0").unwrap(), 0);
        assert_eq!(netmask_to_cidr("255.255.240.0").unwrap(), 20);
        assert!(netmask_to_cidr("255.255.0").is_err());
    }

    #[test]
    fn test_calculate() {
        let summary = calculate("212.224.70.222/24").unwrap();
        assert_eq!(summary.address, "212.224.70.222");
        assert_eq!(summary.gateway.as_deref(), Some("212.224.70.1"));
        assert_eq!(summary.netmask, "255.255.255.0");
        assert_eq!(summary.cidrmask, 24);
        assert_eq!(summary.network, "212.224.70.0");
        assert_eq!(summary.hostmin.as_deref(), Some("212.224.70.2"));
        assert_eq!(summary.hostmax.as_deref(), Some("212.224.70.254"));
        assert_eq!(summary.broadcast, "212.224.70.255");
        assert_eq!(summary.hostcount, 254);
    }

    #[test]
    fn test_calculate_point_to_point_and_host() {
        let summary = calculate("10.0.0.0/31").unwrap();
        assert_eq!(summary.gateway, None);
        assert_eq!(summary.hostcount, 0);

        let summary = calculate("255.255.255.255").unwrap();
        assert_eq!(summary.cidrmask, 32);
        assert_eq!(summary.network, "255.255.255.255");
        assert_eq!(summary.hostmax, None);
        assert_eq!(summary.hostcount, 0);
    }

    #[test]
    fn test_calculate_whole_space() {
        let summary = calculate("1.2.3.4/0").unwrap();
        assert_eq!(summary.netmask, "0.0.0.0");
        assert_eq!(summary.network, "0.0.0.0");
        assert_eq!(summary.broadcast, "255.255.255.255");
        assert_eq!(summary.hostcount, (1u64 << 32) - 2);
    }

    #[test]
    fn test_calculate_rejects_ipv6() {
        assert!(calculate("2a01::1/64").is_err());
        assert!(calculate("1.2.3/24").is_err());
    }

    #[test]
    fn test_address_count() {
        assert_eq!(address_count("10.0.0.0/24").unwrap(), 256);
        assert_eq!(address_count("10.0.0.0/32").unwrap(), 1);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance("10.0.0.1", "10.0.0.10").unwrap(), 9);
        assert_eq!(distance("10.0.0.10", "10.0.0.1").unwrap(), -9);
        assert_eq!(
            distance("0.0.0.0", "255.255.255.255").unwrap(),
            u32::MAX as i64
        );
        assert!(distance("10.0.0.1", "::1").is_err());
    }

    #[test]
    fn test_add_value() {
        assert_eq!(add_value("212.224.70.0/24", 2).unwrap(), "212.224.70.2/24");
        assert_eq!(add_value("10.0.0.255", 1).unwrap(), "10.0.1.0");
        assert_eq!(add_value("10.0.0.0", -1).unwrap(), "9.255.255.255");
    }

    #[test]
    fn test_add_value_overflow() {
        assert!(matches!(
            add_value("255.255.255.255", 1),
            Err(NetcalcError::Overflow(_))
        ));
        assert!(matches!(
            add_value("0.0.0.0", -1),
            Err(NetcalcError::Overflow(_))
        ));
    }

    #[test]
    fn test_offset_extreme_deltas() {
        assert!(matches!(offset(1, i64::MAX), Err(NetcalcError::Overflow(_))));
        assert!(matches!(offset(0, i64::MIN), Err(NetcalcError::Overflow(_))));
        assert_eq!(offset(u32::MAX, -(u32::MAX as i64)).unwrap(), 0);
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("192.168.000.001").unwrap(), "192.168.0.1");
        assert_eq!(clean("010.001.000.000/08").unwrap(), "10.1.0.0/8");
    }

    #[test]
    fn test_list_addresses() {
        let list = list_addresses("10.0.0.5/30").unwrap();
        assert_eq!(list, vec!["10.0.0.4", "10.0.0.5", "10.0.0.6", "10.0.0.7"]);

        let list = list_addresses("10.0.0.0/20").unwrap();
        assert_eq!(list.len(), 4096);
        assert_eq!(list.last().map(String::as_str), Some("10.0.15.255"));
    }

    #[test]
    fn test_list_addresses_refuses_large_blocks() {
        assert_eq!(
            list_addresses("10.0.0.0/19"),
            Err(NetcalcError::RangeTooLarge(19))
        );
        assert_eq!(
            list_addresses("0.0.0.0/0"),
            Err(NetcalcError::RangeTooLarge(0))
        );
    }

    #[test]
    fn test_to_arpa() {
        assert_eq!(to_arpa("212.224.70.0/24").unwrap(), "70.224.212.in-addr.arpa");
        assert_eq!(to_arpa("212.224.70.222").unwrap(), "70.224.212.in-addr.arpa");
        assert_eq!(
            to_arpa("212.224.70.0/25").unwrap(),
            "0-127.70.224.212.in-addr.arpa"
        );
        assert_eq!(
            to_arpa("212.224.70.200/26").unwrap(),
            "192-255.70.224.212.in-addr.arpa"
        );
        assert_eq!(
            to_arpa("212.224.70.9/32").unwrap(),
            "9-9.70.224.212.in-addr.arpa"
        );
    }

    #[test]
    fn test_to_arpa_supernet_unsupported() {
        assert!(matches!(
            to_arpa("212.224.0.0/16"),
            Err(NetcalcError::Unsupported(_))
        ));
    }

    #[test]
    fn test_find_next_subnet() {
        let next = find_next_subnet("10.0.0.0", Some("10.0.0.127"))
            .unwrap()
            .unwrap();
        assert_eq!(next.prefix_len, 25);
        assert_eq!(format::ipv4(next.broadcast), "10.0.0.127");

        let next = find_next_subnet("10.0.0.64", Some("10.0.0.127"))
            .unwrap()
            .unwrap();
        assert_eq!(next.prefix_len, 26);
        assert_eq!(format::ipv4(next.broadcast), "10.0.0.127");
        assert_eq!(next.to_string(), "10.0.0.64/26");
    }

    #[test]
    fn test_find_next_subnet_alignment_limits() {
        // odd address can only be a /32
        let next = find_next_subnet("10.0.0.1", Some("10.0.0.255"))
            .unwrap()
            .unwrap();
        assert_eq!(next.prefix_len, 32);
        assert_eq!(next.broadcast, next.network);

        // capacity limits before alignment does
        let next = find_next_subnet("10.0.0.0", Some("10.0.0.200"))
            .unwrap()
            .unwrap();
        assert_eq!(next.prefix_len, 25);
    }

    #[test]
    fn test_find_next_subnet_bounds() {
        assert_eq!(
            find_next_subnet("10.0.0.2", Some("10.0.0.1")).unwrap(),
            None
        );

        let next = find_next_subnet("10.0.0.5", Some("10.0.0.5"))
            .unwrap()
            .unwrap();
        assert_eq!(next.prefix_len, 32);

        let next = find_next_subnet("0.0.0.0", None).unwrap().unwrap();
        assert_eq!(next.prefix_len, 0);
        assert_eq!(next.broadcast, u32::MAX);

        let next = find_next_subnet("128.0.0.0", None).unwrap().unwrap();
        assert_eq!(next.prefix_len, 1);
    }

    #[test]
    fn test_to_ipv6_mapped() {
        assert_eq!(
            to_ipv6_mapped("192.168.000.001").unwrap(),
            "::ffff:192.168.0.1"
        );
        assert!(to_ipv6_mapped("::1").is_err());
    }
}
