use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A 32-byte account identifier.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LEN: usize = 32;

    pub const ZERO: Self = Self([0; 32]);

    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for AccountAddress {
    type Err = Error;

    /// Parses hex with an optional `0x` prefix.
    ///
    /// Short addresses (e.g. `0x1`) are left-padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if s.is_empty() {
            return Err(Error::InvalidAddress("empty string"));
        }
        if s.len() > Self::LEN * 2 {
            return Err(Error::InvalidAddress("hex string is too long"));
        }

        let mut padded = [b'0'; 64];
        padded[64 - s.len()..].copy_from_slice(s.as_bytes());

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(padded, &mut bytes)
            .map_err(|_e| Error::InvalidAddress("invalid hex character"))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; 32]> for AccountAddress {
    #[inline]
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = [0u8; 64];
        hex::encode_to_slice(self.0, &mut output).map_err(|_e| std::fmt::Error)?;
        f.write_str("0x")?;
        f.write_str(std::str::from_utf8(&output).map_err(|_e| std::fmt::Error)?)
    }
}

impl std::fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        if deserializer.is_human_readable() {
            let s = <std::borrow::Cow<'_, str>>::deserialize(deserializer)?;
            s.parse().map_err(Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}
