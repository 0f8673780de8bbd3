use std::str::FromStr;

use serde::Serialize;

use crate::address::AccountAddress;
use crate::bcs::{BcsRead, BcsWrite, from_bytes, read_uleb128, to_bytes, write_len};
use crate::error::{Error, Result};
use crate::u256::U256;

/// Element types allowed inside a dynamically typed vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    U8,
    U64,
    Bool,
    String,
    Address,
}

impl ElementType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U64 => "u64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Address => "address",
        }
    }

    fn parse_value(self, s: &str) -> Result<MoveValue> {
        let invalid = |reason: String| Error::InvalidValue {
            ty: self.name(),
            reason,
        };

        let trimmed = s.trim();
        Ok(match self {
            Self::U8 => MoveValue::U8(trimmed.parse().map_err(|e| invalid(format!("{e}")))?),
            Self::U64 => MoveValue::U64(trimmed.parse().map_err(|e| invalid(format!("{e}")))?),
            Self::Bool => MoveValue::Bool(trimmed.parse().map_err(|e| invalid(format!("{e}")))?),
            Self::String => MoveValue::String(s.to_owned()),
            Self::Address => MoveValue::Address(trimmed.parse()?),
        })
    }

    fn read_value(self, packet: &[u8], offset: &mut usize) -> Result<MoveValue> {
        Ok(match self {
            Self::U8 => MoveValue::U8(u8::read_from(packet, offset)?),
            Self::U64 => MoveValue::U64(u64::read_from(packet, offset)?),
            Self::Bool => MoveValue::Bool(bool::read_from(packet, offset)?),
            Self::String => MoveValue::String(String::read_from(packet, offset)?),
            Self::Address => MoveValue::Address(AccountAddress::read_from(packet, offset)?),
        })
    }

    fn matches(self, value: &MoveValue) -> bool {
        matches!(
            (self, value),
            (Self::U8, MoveValue::U8(_))
                | (Self::U64, MoveValue::U64(_))
                | (Self::Bool, MoveValue::Bool(_))
                | (Self::String, MoveValue::String(_))
                | (Self::Address, MoveValue::Address(_))
        )
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "u8" => Self::U8,
            "u64" => Self::U64,
            "bool" => Self::Bool,
            "string" | "String" | "0x1::string::String" => Self::String,
            "address" => Self::Address,
            other => return Err(Error::UnsupportedElementType(other.to_owned())),
        })
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument types accepted by the contract entry functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    U8,
    U64,
    U256,
    Bool,
    String,
    Address,
    OptionU64,
    Vector(ElementType),
}

impl MoveType {
    /// Parses a value from its text form.
    ///
    /// `option<u64>` accepts an empty string or `none` for an absent value.
    /// Vector items are separated by commas.
    pub fn parse_value(self, s: &str) -> Result<MoveValue> {
        let invalid = |ty: &'static str, reason: String| Error::InvalidValue { ty, reason };

        Ok(match self {
            Self::U8 => ElementType::U8.parse_value(s)?,
            Self::U64 => ElementType::U64.parse_value(s)?,
            Self::Bool => ElementType::Bool.parse_value(s)?,
            Self::String => ElementType::String.parse_value(s)?,
            Self::Address => ElementType::Address.parse_value(s)?,
            Self::U256 => MoveValue::U256(s.parse()?),
            Self::OptionU64 => match s.trim() {
                "" | "none" => MoveValue::OptionU64(None),
                value => MoveValue::OptionU64(Some(
                    value
                        .parse()
                        .map_err(|e| invalid("option<u64>", format!("{e}")))?,
                )),
            },
            Self::Vector(ty) => {
                let items = match s.trim() {
                    "" => Vec::new(),
                    items => items
                        .split(',')
                        .map(|item| ty.parse_value(item))
                        .collect::<Result<Vec<_>>>()?,
                };
                MoveValue::Vector(ty, items)
            }
        })
    }

    /// Decodes a value which must span the whole buffer.
    pub fn decode(self, packet: &[u8]) -> Result<MoveValue> {
        Ok(match self {
            Self::U8 => MoveValue::U8(from_bytes(packet)?),
            Self::U64 => MoveValue::U64(from_bytes(packet)?),
            Self::U256 => MoveValue::U256(from_bytes(packet)?),
            Self::Bool => MoveValue::Bool(from_bytes(packet)?),
            Self::String => MoveValue::String(from_bytes(packet)?),
            Self::Address => MoveValue::Address(from_bytes(packet)?),
            Self::OptionU64 => MoveValue::OptionU64(from_bytes(packet)?),
            Self::Vector(ty) => {
                let mut offset = 0;
                let len = read_uleb128(packet, &mut offset)? as usize;

                let mut items = Vec::with_capacity(len.min(packet.len() - offset));
                for _ in 0..len {
                    items.push(ty.read_value(packet, &mut offset)?);
                }

                match packet.len() - offset {
                    0 => MoveValue::Vector(ty, items),
                    rest => return Err(Error::TrailingBytes(rest)),
                }
            }
        })
    }
}

impl FromStr for MoveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_prefix("vector<").and_then(|s| s.strip_suffix('>')) {
            return inner.parse().map(Self::Vector);
        }

        Ok(match s {
            "u8" => Self::U8,
            "u64" => Self::U64,
            "u256" => Self::U256,
            "bool" => Self::Bool,
            "string" | "String" | "0x1::string::String" => Self::String,
            "address" => Self::Address,
            "option<u64>" | "0x1::option::Option<u64>" => Self::OptionU64,
            other => return Err(Error::UnsupportedElementType(other.to_owned())),
        })
    }
}

impl std::fmt::Display for MoveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U8 => f.write_str("u8"),
            Self::U64 => f.write_str("u64"),
            Self::U256 => f.write_str("u256"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::Address => f.write_str("address"),
            Self::OptionU64 => f.write_str("option<u64>"),
            Self::Vector(ty) => write!(f, "vector<{ty}>"),
        }
    }
}

/// A dynamically typed contract argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    U8(u8),
    U64(u64),
    U256(U256),
    Bool(bool),
    String(String),
    Address(AccountAddress),
    OptionU64(Option<u64>),
    Vector(ElementType, Vec<MoveValue>),
}

impl Serialize for MoveValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::U8(value) => value.serialize(serializer),
            Self::U64(value) => value.serialize(serializer),
            Self::U256(value) => value.serialize(serializer),
            Self::Bool(value) => value.serialize(serializer),
            Self::String(value) => value.serialize(serializer),
            Self::Address(value) => value.serialize(serializer),
            Self::OptionU64(value) => value.serialize(serializer),
            Self::Vector(_, items) => items.serialize(serializer),
        }
    }
}

impl MoveValue {
    pub fn ty(&self) -> MoveType {
        match self {
            Self::U8(_) => MoveType::U8,
            Self::U64(_) => MoveType::U64,
            Self::U256(_) => MoveType::U256,
            Self::Bool(_) => MoveType::Bool,
            Self::String(_) => MoveType::String,
            Self::Address(_) => MoveType::Address,
            Self::OptionU64(_) => MoveType::OptionU64,
            Self::Vector(ty, _) => MoveType::Vector(*ty),
        }
    }

    /// Builds a homogeneous vector, rejecting items of other types.
    pub fn vector(ty: ElementType, items: Vec<MoveValue>) -> Result<Self> {
        match items.iter().find(|item| !ty.matches(item)) {
            None => Ok(Self::Vector(ty, items)),
            Some(item) => Err(Error::InvalidValue {
                ty: ty.name(),
                reason: format!("vector item of type {}", item.ty()),
            }),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(self)
    }
}

impl BcsWrite for MoveValue {
    fn max_size_hint(&self) -> usize {
        match self {
            Self::U8(value) => value.max_size_hint(),
            Self::U64(value) => value.max_size_hint(),
            Self::U256(value) => value.max_size_hint(),
            Self::Bool(value) => value.max_size_hint(),
            Self::String(value) => value.max_size_hint(),
            Self::Address(value) => value.max_size_hint(),
            Self::OptionU64(value) => value.max_size_hint(),
            Self::Vector(_, items) => items.max_size_hint(),
        }
    }

    fn write_to(&self, packet: &mut Vec<u8>) {
        match self {
            Self::U8(value) => value.write_to(packet),
            Self::U64(value) => value.write_to(packet),
            Self::U256(value) => value.write_to(packet),
            Self::Bool(value) => value.write_to(packet),
            Self::String(value) => value.write_to(packet),
            Self::Address(value) => value.write_to(packet),
            Self::OptionU64(value) => value.write_to(packet),
            Self::Vector(_, items) => {
                write_len(items.len(), packet);
                for item in items {
                    item.write_to(packet);
                }
            }
        }
    }
}
