use std::path::Path;

use anyhow::Result;
use serde::de::{Error, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn load_json_from_file<T, P>(path: P) -> Result<T>
where
    for<'de> T: Deserialize<'de>,
    P: AsRef<Path>,
{
    let data = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&data);
    serde_path_to_error::deserialize(de).map_err(Into::into)
}

pub mod humantime {
    use std::time::Duration;

    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&::humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        struct V;

        impl Visitor<'_> for V {
            type Value = Duration;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a duration")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Duration, E> {
                ::humantime::parse_duration(v)
                    .map_err(|_e| E::invalid_value(serde::de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(V)
    }
}

/// `0x`-prefixed hex representation of raw bytes.
pub mod hex_bytes {
    use super::*;

    pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{}", hex::encode(data)))
        } else {
            serializer.serialize_bytes(data)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <std::borrow::Cow<'_, str>>::deserialize(deserializer)?;
            let s = s.strip_prefix("0x").unwrap_or(&s);
            hex::decode(s).map_err(Error::custom)
        } else {
            <Vec<u8>>::deserialize(deserializer)
        }
    }
}

/// A list of byte strings, each item as in [`hex_bytes`].
pub mod hex_bytes_list {
    use super::*;

    pub fn serialize<S>(data: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        struct Helper<'a>(#[serde(with = "hex_bytes")] &'a [u8]);

        serializer.collect_seq(data.iter().map(|item| Helper(item)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        struct Helper(#[serde(with = "hex_bytes")] Vec<u8>);

        <Vec<Helper>>::deserialize(deserializer)
            .map(|items| items.into_iter().map(|Helper(item)| item).collect())
    }
}
