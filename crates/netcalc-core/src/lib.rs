//! Core types for netcalc
//!
//! This crate provides the foundational pieces shared by the calculators:
//! - [`AddressFamily`] - IPv4 / IPv6 tag
//! - [`parse`] - address and CIDR validation
//! - [`format`] - canonical text rendering
//! - [`NetcalcError`] - Error types
//!
//! ```
//! use netcalc_core::{classify, AddressFamily};
//!
//! assert_eq!(classify("192.168.0.1/24"), Some(AddressFamily::V4));
//! assert_eq!(classify("2a01:7e0::1"), Some(AddressFamily::V6));
//! assert_eq!(classify("10.0.0.1/33"), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod format;
pub mod parse;

pub use parse::{classify, parse, parse_cidr, Address, ParsedInput};

/// Address family of a parsed address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    /// 32-bit IPv4
    #[serde(rename = "ipv4")]
    V4,
    /// 128-bit IPv6
    #[serde(rename = "ipv6")]
    V6,
}

impl AddressFamily {
    /// Width of the address space in bits, which is also the longest prefix
    pub fn max_prefix_len(self) -> u8 {
        match self {
            AddressFamily::V4 => 32,
            AddressFamily::V6 => 128,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Error types for netcalc operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetcalcError {
    /// Input is not an address of any family
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    /// CIDR notation expected but missing or malformed
    #[error("Invalid CIDR notation: {0}")]
    InvalidNotation(String),

    /// Prefix outside the family's width
    #[error("Invalid prefix length: /{prefix} (must be 0-{} for {family})", .family.max_prefix_len())]
    InvalidPrefixLength { family: AddressFamily, prefix: u32 },

    /// Operands of different families
    #[error("Address family mismatch: expected {expected}, found {found}")]
    FamilyMismatch {
        expected: AddressFamily,
        found: AddressFamily,
    },

    /// Result leaves the address space
    #[error("Address overflow: {0}")]
    Overflow(String),

    /// Enumeration refused to bound memory
    #[error("CIDR range too large: /{0} (use /20 or longer)")]
    RangeTooLarge(u8),

    /// Operation has no implementation for this input
    #[error("Not supported: {0}")]
    Unsupported(String),
}

/// Result type alias for netcalc operations
pub type Result<T> = std::result::Result<T, NetcalcError>;
