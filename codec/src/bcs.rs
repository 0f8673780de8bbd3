use crate::address::AccountAddress;
use crate::error::{Error, Result};
use crate::u256::U256;

/// A value with a canonical binary representation.
pub trait BcsWrite {
    /// Upper bound of the encoded size, used to preallocate buffers.
    fn max_size_hint(&self) -> usize;

    fn write_to(&self, packet: &mut Vec<u8>);
}

/// A value which can be read back from its canonical binary representation.
///
/// `offset` is advanced past the consumed bytes only on success.
pub trait BcsRead: Sized {
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self>;
}

pub fn to_bytes<T: BcsWrite + ?Sized>(value: &T) -> Vec<u8> {
    let mut packet = Vec::with_capacity(value.max_size_hint());
    value.write_to(&mut packet);
    packet
}

/// Decodes a single value which must span the whole buffer.
pub fn from_bytes<T: BcsRead>(packet: &[u8]) -> Result<T> {
    let mut offset = 0;
    let value = T::read_from(packet, &mut offset)?;
    match packet.len() - offset {
        0 => Ok(value),
        rest => Err(Error::TrailingBytes(rest)),
    }
}

// === Uleb128 ===

const MAX_ULEB128_LEN: usize = 5;

pub const fn uleb128_size_hint(mut value: u32) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

pub fn write_uleb128(mut value: u32, packet: &mut Vec<u8>) {
    while value >= 0x80 {
        packet.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    packet.push(value as u8);
}

pub fn read_uleb128(packet: &[u8], offset: &mut usize) -> Result<u32> {
    let mut value: u64 = 0;
    for (i, byte) in packet.iter().skip(*offset).take(MAX_ULEB128_LEN).enumerate() {
        value |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            let value = u32::try_from(value).map_err(|_e| Error::InvalidUleb128)?;
            *offset += i + 1;
            return Ok(value);
        }
    }

    match packet.len().saturating_sub(*offset) {
        remaining if remaining < MAX_ULEB128_LEN => Err(Error::UnexpectedEof {
            expected: remaining + 1,
            remaining,
        }),
        _ => Err(Error::InvalidUleb128),
    }
}

/// Sequence lengths are encoded as a `u32`.
///
/// # Panics
///
/// Panics if `len` does not fit into a `u32`.
pub(crate) fn len_prefix(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("sequence of {len} elements is too long to encode"),
    }
}

pub(crate) fn write_len(len: usize, packet: &mut Vec<u8>) {
    write_uleb128(len_prefix(len), packet);
}

fn read_fixed<const N: usize>(packet: &[u8], offset: &mut usize) -> Result<[u8; N]> {
    let remaining = packet.len().saturating_sub(*offset);
    match packet.get(*offset..*offset + N) {
        Some(bytes) => {
            let mut result = [0u8; N];
            result.copy_from_slice(bytes);
            *offset += N;
            Ok(result)
        }
        None => Err(Error::UnexpectedEof {
            expected: N,
            remaining,
        }),
    }
}

fn read_slice<'a>(packet: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    let remaining = packet.len().saturating_sub(*offset);
    if remaining < len {
        return Err(Error::UnexpectedEof {
            expected: len,
            remaining,
        });
    }
    let bytes = &packet[*offset..*offset + len];
    *offset += len;
    Ok(bytes)
}

// === Primitives ===

impl BcsWrite for u8 {
    #[inline]
    fn max_size_hint(&self) -> usize {
        1
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        packet.push(*self);
    }
}

impl BcsRead for u8 {
    #[inline]
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        read_fixed::<1>(packet, offset).map(|[byte]| byte)
    }
}

impl BcsWrite for u64 {
    #[inline]
    fn max_size_hint(&self) -> usize {
        8
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        packet.extend_from_slice(&self.to_le_bytes());
    }
}

impl BcsRead for u64 {
    #[inline]
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        read_fixed(packet, offset).map(u64::from_le_bytes)
    }
}

impl BcsWrite for U256 {
    #[inline]
    fn max_size_hint(&self) -> usize {
        32
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        packet.extend_from_slice(self.as_le_bytes());
    }
}

impl BcsRead for U256 {
    #[inline]
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        read_fixed(packet, offset).map(U256::from_le_bytes)
    }
}

impl BcsWrite for bool {
    #[inline]
    fn max_size_hint(&self) -> usize {
        1
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        packet.push(*self as u8);
    }
}

impl BcsRead for bool {
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        let mut cursor = *offset;
        let value = match u8::read_from(packet, &mut cursor)? {
            0 => false,
            1 => true,
            other => return Err(Error::InvalidBool(other)),
        };
        *offset = cursor;
        Ok(value)
    }
}

impl BcsWrite for AccountAddress {
    #[inline]
    fn max_size_hint(&self) -> usize {
        AccountAddress::LEN
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        packet.extend_from_slice(self.as_bytes());
    }
}

impl BcsRead for AccountAddress {
    #[inline]
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        read_fixed(packet, offset).map(AccountAddress::new)
    }
}

impl BcsWrite for str {
    #[inline]
    fn max_size_hint(&self) -> usize {
        uleb128_size_hint(len_prefix(self.len())) + self.len()
    }

    fn write_to(&self, packet: &mut Vec<u8>) {
        write_len(self.len(), packet);
        packet.extend_from_slice(self.as_bytes());
    }
}

impl BcsWrite for String {
    #[inline]
    fn max_size_hint(&self) -> usize {
        self.as_str().max_size_hint()
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        self.as_str().write_to(packet);
    }
}

impl BcsRead for String {
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        let mut cursor = *offset;
        let len = read_uleb128(packet, &mut cursor)? as usize;
        let bytes = read_slice(packet, &mut cursor, len)?;
        let value = std::str::from_utf8(bytes).map_err(|_e| Error::InvalidUtf8)?;
        *offset = cursor;
        Ok(value.to_owned())
    }
}

// === Containers ===

impl<T: BcsWrite> BcsWrite for Option<T> {
    #[inline]
    fn max_size_hint(&self) -> usize {
        1 + self.as_ref().map(T::max_size_hint).unwrap_or_default()
    }

    fn write_to(&self, packet: &mut Vec<u8>) {
        match self {
            Some(value) => {
                true.write_to(packet);
                value.write_to(packet);
            }
            None => false.write_to(packet),
        }
    }
}

impl<T: BcsRead> BcsRead for Option<T> {
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        let mut cursor = *offset;
        let value = if bool::read_from(packet, &mut cursor)? {
            Some(T::read_from(packet, &mut cursor)?)
        } else {
            None
        };
        *offset = cursor;
        Ok(value)
    }
}

impl<T: BcsWrite> BcsWrite for [T] {
    fn max_size_hint(&self) -> usize {
        let items = self.iter().map(T::max_size_hint).sum::<usize>();
        uleb128_size_hint(len_prefix(self.len())) + items
    }

    fn write_to(&self, packet: &mut Vec<u8>) {
        write_len(self.len(), packet);
        for item in self {
            item.write_to(packet);
        }
    }
}

impl<T: BcsWrite> BcsWrite for Vec<T> {
    #[inline]
    fn max_size_hint(&self) -> usize {
        self.as_slice().max_size_hint()
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        self.as_slice().write_to(packet);
    }
}

impl<T: BcsRead> BcsRead for Vec<T> {
    fn read_from(packet: &[u8], offset: &mut usize) -> Result<Self> {
        let mut cursor = *offset;
        let len = read_uleb128(packet, &mut cursor)? as usize;

        // Every element takes at least one byte
        let remaining = packet.len().saturating_sub(cursor);
        let mut items = Vec::with_capacity(len.min(remaining));
        for _ in 0..len {
            items.push(T::read_from(packet, &mut cursor)?);
        }

        *offset = cursor;
        Ok(items)
    }
}

impl<T: BcsWrite + ?Sized> BcsWrite for &T {
    #[inline]
    fn max_size_hint(&self) -> usize {
        T::max_size_hint(self)
    }

    #[inline]
    fn write_to(&self, packet: &mut Vec<u8>) {
        T::write_to(self, packet);
    }
}

// === Conversion helpers ===

pub fn serialize_str(value: &str) -> Vec<u8> {
    to_bytes(value)
}

pub fn serialize_u8(value: u8) -> Vec<u8> {
    to_bytes(&value)
}

pub fn serialize_u64(value: u64) -> Vec<u8> {
    to_bytes(&value)
}

pub fn serialize_u256(value: &U256) -> Vec<u8> {
    to_bytes(value)
}

pub fn serialize_bool(value: bool) -> Vec<u8> {
    to_bytes(&value)
}

pub fn serialize_address(value: &AccountAddress) -> Vec<u8> {
    to_bytes(value)
}

pub fn serialize_option_u64(value: Option<u64>) -> Vec<u8> {
    to_bytes(&value)
}

pub fn serialize_vector<T: BcsWrite>(values: &[T]) -> Vec<u8> {
    to_bytes(values)
}

pub fn deserialize_str(packet: &[u8]) -> Result<String> {
    from_bytes(packet)
}

pub fn deserialize_u8(packet: &[u8]) -> Result<u8> {
    from_bytes(packet)
}

pub fn deserialize_u64(packet: &[u8]) -> Result<u64> {
    from_bytes(packet)
}

pub fn deserialize_bool(packet: &[u8]) -> Result<bool> {
    from_bytes(packet)
}

/// Returns the address as `0x`-prefixed lowercase hex.
pub fn deserialize_address(packet: &[u8]) -> Result<String> {
    from_bytes::<AccountAddress>(packet).map(|address| address.to_string())
}

pub fn deserialize_option_u64(packet: &[u8]) -> Result<Option<u64>> {
    from_bytes(packet)
}

pub fn deserialize_vector<T: BcsRead>(packet: &[u8]) -> Result<Vec<T>> {
    from_bytes(packet)
}
