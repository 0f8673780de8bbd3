use serde::{Deserialize, Deserializer, Serialize};

use crate::bcs::{BcsRead, BcsWrite};
use crate::error::Result;

/// Host form of an on-chain `Option<T>` as returned by view calls.
///
/// The node renders options as `{"vec": []}` or `{"vec": [value]}`.
/// The inner vector never holds more than one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOption<T> {
    vec: Vec<T>,
}

impl<T> MoveOption<T> {
    pub const fn none() -> Self {
        Self { vec: Vec::new() }
    }

    pub fn some(value: T) -> Self {
        Self { vec: vec![value] }
    }

    #[inline]
    pub fn contains(&self) -> bool {
        !self.vec.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &[T] {
        &self.vec
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.vec.first()
    }

    pub fn into_option(self) -> Option<T> {
        self.vec.into_iter().next()
    }
}

impl<T> Default for MoveOption<T> {
    #[inline]
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for MoveOption<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::some(value),
            None => Self::none(),
        }
    }
}

impl<T> From<MoveOption<T>> for Option<T> {
    #[inline]
    fn from(value: MoveOption<T>) -> Self {
        value.into_option()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for MoveOption<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct Helper<T> {
            vec: Vec<T>,
        }

        let Helper { vec } = Helper::deserialize(deserializer)?;
        if vec.len() > 1 {
            return Err(Error::invalid_length(vec.len(), &"zero or one element"));
        }
        Ok(Self { vec })
    }
}

impl<T: BcsWrite> BcsWrite for MoveOption<T> {
    #[inline]
    fn max_size_hint(&self) -> usize {
        1 + self.get().map(T::max_size_hint).unwrap_or_default()
    }

    fn write_to(&self, packet: &mut Vec<u8>) {
        self.contains().write_to(packet);
        if let Some(value) = self.get() {
            value.write_to(packet);
        }
    }
}

impl<T: BcsRead> BcsRead for MoveOption<T> {
    #[inline]
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        <Option<T>>::read_from(packet, offset).map(Self::from)
    }
}
