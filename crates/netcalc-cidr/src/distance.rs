//! Signed distance between two addresses
//!
//! IPv6 differences span ±(2^128 - 1), which no native signed integer can
//! hold, so the value is kept as a sign and a `u128` magnitude.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Neg;

/// Exact signed difference `to - from`
///
/// # Examples
///
/// ```
/// use netcalc_cidr::Distance;
///
/// let d = Distance::between(1, 10);
/// assert_eq!(d.to_i128(), Some(9));
/// assert_eq!(-d, Distance::between(10, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Distance {
    negative: bool,
    magnitude: u128,
}

impl Distance {
    /// Distance from `from` to `to`, negative when `to` is lower
    pub fn between(from: u128, to: u128) -> Self {
        if to >= from {
            Self {
                negative: false,
                magnitude: to - from,
            }
        } else {
            Self {
                negative: true,
                magnitude: from - to,
            }
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Absolute value
    pub fn magnitude(&self) -> u128 {
        self.magnitude
    }

    /// Value as `i128`, if it fits
    pub fn to_i128(&self) -> Option<i128> {
        if self.negative {
            if self.magnitude == 1u128 << 127 {
                Some(i128::MIN)
            } else {
                i128::try_from(self.magnitude).ok().map(|m| -m)
            }
        } else {
            i128::try_from(self.magnitude).ok()
        }
    }

    /// Value as `i64`, if it fits
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }
}

impl Neg for Distance {
    type Output = Self;

    fn neg(self) -> Self {
        // zero has no sign
        if self.magnitude == 0 {
            return self;
        }
        Self {
            negative: !self.negative,
            magnitude: self.magnitude,
        }
    }
}

impl From<i64> for Distance {
    fn from(value: i64) -> Self {
        Self {
            negative: value < 0,
            magnitude: value.unsigned_abs() as u128,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

/// Serialized as a decimal string so JSON consumers keep full precision
impl Serialize for Distance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
