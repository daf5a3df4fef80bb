//! Canonical text rendering
//!
//! - IPv4: dotted decimal, no leading zeros (`192.168.0.1`)
//! - IPv6 full: eight zero-padded groups (`2a01:07e0:0000:0000:0000:0000:0000:0001`)
//! - IPv6 hex: the full form without separators (`2a0107e0000000000000000000000001`)
//! - IPv6 compressed: longest zero run elided once (`2a01:7e0::1`)
//!
//! # Examples
//!
//! ```
//! use netcalc_core::format;
//!
//! assert_eq!(format::ipv4(0xC0A80001), "192.168.0.1");
//! assert_eq!(format::ipv6_compressed(0x2a0107e0_0000_0000_0000_0000_0000_0001), "2a01:7e0::1");
//! ```

/// Render an IPv4 address as dotted decimal
pub fn ipv4(addr: u32) -> String {
    let [a, b, c, d] = addr.to_be_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}

/// Split an IPv6 address into its eight 16-bit groups, most significant first
pub fn ipv6_groups(addr: u128) -> [u16; 8] {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = (addr >> (112 - i * 16)) as u16;
    }
    groups
}

/// Render an IPv6 address in full form, every group padded to four digits
pub fn ipv6_full(addr: u128) -> String {
    ipv6_groups(addr)
        .iter()
        .map(|g| format!("{:04x}", g))
        .collect::<Vec<_>>()
        .join(":")
}

/// Render an IPv6 address as 32 hex digits with no separators
pub fn ipv6_hex(addr: u128) -> String {
    format!("{:032x}", addr)
}

/// Render an IPv6 address in compressed form
///
/// The longest run of zero groups is replaced by `::`. Ties go to the
/// leftmost run, and a single zero group is elided when it is the longest
/// run. Every other group is lowercase hex without leading zeros.
pub fn ipv6_compressed(addr: u128) -> String {
    let groups = ipv6_groups(addr);

    match longest_zero_run(&groups) {
        Some((start, len)) => format!(
            "{}::{}",
            join_groups(&groups[..start]),
            join_groups(&groups[start + len..])
        ),
        None => join_groups(&groups),
    }
}

fn join_groups(groups: &[u16]) -> String {
    groups
        .iter()
        .map(|g| format!("{:x}", g))
        .collect::<Vec<_>>()
        .join(":")
}

/// Start and length of the longest run of zero groups, leftmost on ties
fn longest_zero_run(groups: &[u16; 8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;

    while i < groups.len() {
        if groups[i] != 0 {
            i += 1;
            continue;
        }

        let start = i;
        while i < groups.len() && groups[i] == 0 {
            i += 1;
        }

        let len = i - start;
        if best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
    }

    best
}
