use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Unsigned 256-bit integer stored as little-endian bytes.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: Self = Self([0; 32]);
    pub const MAX: Self = Self([0xff; 32]);

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_le_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `None` if the value does not fit into 256 bits.
    pub fn from_biguint(value: &BigUint) -> Option<Self> {
        let bytes = value.to_bytes_le();
        if bytes.len() > 32 {
            return None;
        }
        let mut result = [0u8; 32];
        result[..bytes.len()].copy_from_slice(&bytes);
        Some(Self(result))
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut result = [0u8; 32];
        result[..16].copy_from_slice(&value.to_le_bytes());
        Self(result)
    }
}

impl FromStr for U256 {
    type Err = Error;

    /// Parses a decimal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidValue {
            ty: "u256",
            reason: reason.to_owned(),
        };

        let value = s
            .trim()
            .parse::<BigUint>()
            .map_err(|e| invalid(&e.to_string()))?;
        Self::from_biguint(&value).ok_or_else(|| invalid("number too large"))
    }
}

impl std::fmt::Display for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_biguint(), f)
    }
}

impl std::fmt::Debug for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "U256({self})")
    }
}

impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let s = <std::borrow::Cow<'_, str>>::deserialize(deserializer)?;
        s.parse().map_err(Error::custom)
    }
}
