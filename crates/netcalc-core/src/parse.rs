//! Address and CIDR validation
//!
//! Accepts dotted-decimal IPv4 (`212.224.70.222`) and colon-hex IPv6
//! (`2a01:7e0::1`, `::ffff:192.168.0.1`), each with an optional `/prefix`.
//! Anything else is rejected as a whole, never partially parsed.

use crate::{format, AddressFamily, NetcalcError, Result};
use std::fmt;
use std::net::Ipv6Addr;

/// A family-tagged address value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// IPv4 address as a host-order u32
    V4(u32),
    /// IPv6 address as a host-order u128
    V6(u128),
}

impl Address {
    pub fn family(&self) -> AddressFamily {
        match self {
            Address::V4(_) => AddressFamily::V4,
            Address::V6(_) => AddressFamily::V6,
        }
    }

    /// Numeric IPv4 value, or a family mismatch
    pub fn into_v4(self) -> Result<u32> {
        match self {
            Address::V4(addr) => Ok(addr),
            Address::V6(_) => Err(NetcalcError::FamilyMismatch {
                expected: AddressFamily::V4,
                found: AddressFamily::V6,
            }),
        }
    }

    /// Numeric IPv6 value, or a family mismatch
    pub fn into_v6(self) -> Result<u128> {
        match self {
            Address::V6(addr) => Ok(addr),
            Address::V4(_) => Err(NetcalcError::FamilyMismatch {
                expected: AddressFamily::V6,
                found: AddressFamily::V4,
            }),
        }
    }
}

/// Canonical form: dotted decimal for IPv4, compressed for IPv6
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::V4(addr) => f.write_str(&format::ipv4(*addr)),
            Address::V6(addr) => f.write_str(&format::ipv6_compressed(*addr)),
        }
    }
}

/// An address with its optional CIDR prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedInput {
    pub address: Address,
    pub prefix: Option<u8>,
}

impl ParsedInput {
    pub fn family(&self) -> AddressFamily {
        self.address.family()
    }

    /// Prefix length, treating a bare address as a single-host block
    pub fn prefix_or_host(&self) -> u8 {
        self.prefix.unwrap_or_else(|| self.family().max_prefix_len())
    }
}

impl fmt::Display for ParsedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}/{}", self.address, prefix),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Classify text as IPv4, IPv6, or neither (`None`)
///
/// A trailing `/prefix` is allowed but must be in range for the family.
///
/// # Examples
///
/// ```
/// use netcalc_core::{classify, AddressFamily};
///
/// assert_eq!(classify("10.0.0.0/8"), Some(AddressFamily::V4));
/// assert_eq!(classify("::1/129"), None);
/// assert_eq!(classify("not-an-ip"), None);
/// ```
pub fn classify(text: &str) -> Option<AddressFamily> {
    parse(text).ok().map(|input| input.family())
}

/// Parse an address with an optional `/prefix`
pub fn parse(text: &str) -> Result<ParsedInput> {
    let (addr_str, prefix_str) = split_prefix(text);
    let address = parse_address(addr_str)?;

    let prefix = match prefix_str {
        Some(p) => Some(parse_prefix(p, address.family())?),
        None => None,
    };

    Ok(ParsedInput { address, prefix })
}

/// Parse CIDR notation; the prefix is mandatory
///
/// # Examples
///
/// ```
/// use netcalc_core::{parse_cidr, Address};
///
/// let (addr, prefix) = parse_cidr("192.168.1.7/24").unwrap();
/// assert_eq!(addr, Address::V4(0xC0A80107));
/// assert_eq!(prefix, 24);
/// assert!(parse_cidr("192.168.1.7").is_err());
/// ```
pub fn parse_cidr(text: &str) -> Result<(Address, u8)> {
    let input = parse(text)?;
    match input.prefix {
        Some(prefix) => Ok((input.address, prefix)),
        None => Err(NetcalcError::InvalidNotation(format!(
            "expected address/prefix, got {}",
            text
        ))),
    }
}

/// Parse a bare address of either family
pub fn parse_address(text: &str) -> Result<Address> {
    if text.contains(':') {
        parse_ipv6(text).map(Address::V6)
    } else {
        parse_ipv4(text).map(Address::V4)
    }
}

/// Split `addr/prefix` into its two halves
pub fn split_prefix(text: &str) -> (&str, Option<&str>) {
    match text.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (text, None),
    }
}

/// Parse dotted-decimal IPv4 to u32
///
/// Each octet is one to three ASCII digits; leading zeros are accepted.
pub fn parse_ipv4(text: &str) -> Result<u32> {
    let invalid = || NetcalcError::InvalidAddress(text.to_string());

    let octets: Vec<&str> = text.split('.').collect();
    if octets.len() != 4 {
        return Err(invalid());
    }

    let mut result = 0u32;
    for (i, octet_str) in octets.iter().enumerate() {
        if !is_short_decimal(octet_str) {
            return Err(invalid());
        }
        let octet: u8 = octet_str.parse().map_err(|_| invalid())?;
        result |= (octet as u32) << (24 - i * 8);
    }

    Ok(result)
}

/// Parse colon-hex IPv6 (including `::` and an IPv4 tail) to u128
pub fn parse_ipv6(text: &str) -> Result<u128> {
    text.parse::<Ipv6Addr>()
        .map(u128::from)
        .map_err(|_| NetcalcError::InvalidAddress(text.to_string()))
}

/// Parse a prefix length and check it against the family width
pub fn parse_prefix(text: &str, family: AddressFamily) -> Result<u8> {
    if !is_short_decimal(text) {
        return Err(NetcalcError::InvalidNotation(format!(
            "invalid prefix: {}",
            text
        )));
    }

    let prefix: u32 = text
        .parse()
        .map_err(|_| NetcalcError::InvalidNotation(format!("invalid prefix: {}", text)))?;

    check_prefix(prefix, family)
}

/// Reject prefixes wider than the family
pub fn check_prefix(prefix: u32, family: AddressFamily) -> Result<u8> {
    if prefix > family.max_prefix_len() as u32 {
        return Err(NetcalcError::InvalidPrefixLength { family, prefix });
    }
    Ok(prefix as u8)
}

fn is_short_decimal(s: &str) -> bool {
    (1..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
