//! Byte-exact encoding of voting contract arguments.
//!
//! Arguments use BCS (the Move canonical serialization): fixed-width little-endian
//! integers, `0`/`1` bools, Uleb128 length prefixes for strings and vectors,
//! and a presence byte for options. View-call results come back from the node
//! already decoded into JSON and are parsed by the typed decoders in [`view`].

pub use self::address::AccountAddress;
pub use self::bcs::{
    BcsRead, BcsWrite, deserialize_address, deserialize_bool, deserialize_option_u64,
    deserialize_str, deserialize_u8, deserialize_u64, deserialize_vector, from_bytes,
    read_uleb128, serialize_address, serialize_bool, serialize_option_u64, serialize_str,
    serialize_u8, serialize_u64, serialize_u256, serialize_vector, to_bytes, write_uleb128,
};
pub use self::dynamic::{ElementType, MoveType, MoveValue};
pub use self::error::{Error, Result};
pub use self::hex_text::{hex_to_string, string_to_hex};
pub use self::models::{CandidateDetails, ElectionInfo, ElectionWinner};
pub use self::option::MoveOption;
pub use self::u256::U256;

pub mod view;

mod address;
mod bcs;
mod dynamic;
mod error;
mod hex_text;
mod models;
mod option;
mod u256;
