//! Variable-length integer codec
//!
//! VarInt/VarLong encoding: 7 payload bits per byte, bit 7 is the
//! continuation flag, least-significant group first. A `u32` takes 1-5
//! bytes, a `u64` 1-10. The final group is width-limited (4 significant
//! bits for the 5th byte of a VarInt, 1 bit for the 10th byte of a
//! VarLong), so every value has exactly one valid encoding.
//!
//! Signed values go through the ZigZag transform first so small-magnitude
//! negatives also encode short.

use bytes::{Buf, BufMut, BytesMut};
use gamewire_core::{Result, WireError};

/// Maximum encoded length of a VarInt (32-bit)
pub const MAX_VARINT_LEN: usize = 5;

/// Maximum encoded length of a VarLong (64-bit)
pub const MAX_VARLONG_LEN: usize = 10;

/// Write a `u32` as a VarInt (1-5 bytes)
///
/// # Format
/// Each byte carries 7 payload bits in its low bits; bit 7 is set on every
/// byte except the last. Groups are emitted least-significant first.
/// `0` encodes as a single `0x00` byte.
#[inline]
pub fn write_varint(buf: &mut BytesMut, mut value: u32) {
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            buf.put_u8(group | 0x80);
        } else {
            buf.put_u8(group);
            break;
        }
    }
}

/// Read a VarInt from an arbitrary byte source, one byte at a time
///
/// `next_byte` is called once per group and returns `Ok(None)` when the
/// source is exhausted. Stops at the terminating byte; bytes past the
/// terminator are never requested.
///
/// # Errors
/// - [`WireError::ShortRead`] if the source ends before the terminator
/// - [`WireError::InvalidFormat`] if the 5th byte still has the
///   continuation flag set or carries more than 4 significant bits
pub fn read_varint_from<F>(mut next_byte: F) -> Result<(u32, usize)>
where
    F: FnMut() -> Result<Option<u8>>,
{
    let mut value = 0u32;
    for i in 0..MAX_VARINT_LEN {
        let byte = next_byte()?.ok_or(WireError::ShortRead {
            needed: i + 1,
            got: i,
        })?;
        if i == MAX_VARINT_LEN - 1 && byte > 0x0F {
            return Err(WireError::InvalidFormat(format!(
                "VarInt 5th byte 0x{byte:02X} exceeds 4 significant bits"
            )));
        }
        value |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    // Unreachable: the width check above rejects a continued 5th byte.
    Err(WireError::InvalidFormat(
        "VarInt not terminated within 5 bytes".into(),
    ))
}

/// Read a VarInt from a buffer, returning the value and bytes consumed
#[inline]
pub fn read_varint(buf: &mut BytesMut) -> Result<(u32, usize)> {
    read_varint_from(|| Ok(buf.has_remaining().then(|| buf.get_u8())))
}

/// Write a `u64` as a VarLong (1-10 bytes)
#[inline]
pub fn write_varlong(buf: &mut BytesMut, mut value: u64) {
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            buf.put_u8(group | 0x80);
        } else {
            buf.put_u8(group);
            break;
        }
    }
}

/// Read a VarLong from an arbitrary byte source, one byte at a time
///
/// # Errors
/// - [`WireError::ShortRead`] if the source ends before the terminator
/// - [`WireError::InvalidFormat`] if the 10th byte still has the
///   continuation flag set or carries more than 1 significant bit
pub fn read_varlong_from<F>(mut next_byte: F) -> Result<(u64, usize)>
where
    F: FnMut() -> Result<Option<u8>>,
{
    let mut value = 0u64;
    for i in 0..MAX_VARLONG_LEN {
        let byte = next_byte()?.ok_or(WireError::ShortRead {
            needed: i + 1,
            got: i,
        })?;
        if i == MAX_VARLONG_LEN - 1 && byte > 0x01 {
            return Err(WireError::InvalidFormat(format!(
                "VarLong 10th byte 0x{byte:02X} exceeds 1 significant bit"
            )));
        }
        value |= ((byte & 0x7F) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(WireError::InvalidFormat(
        "VarLong not terminated within 10 bytes".into(),
    ))
}

/// Read a VarLong from a buffer, returning the value and bytes consumed
#[inline]
pub fn read_varlong(buf: &mut BytesMut) -> Result<(u64, usize)> {
    read_varlong_from(|| Ok(buf.has_remaining().then(|| buf.get_u8())))
}

/// ZigZag-encode an `i32`
///
/// # Format
/// `(value << 1) ^ (value >> 31)`. Bijective over the full signed range,
/// including `i32::MIN` (which maps to `u32::MAX`).
#[inline]
pub fn zigzag32(value: i32) -> u32 {
    (value.wrapping_shl(1) ^ (value >> 31)) as u32
}

/// Invert [`zigzag32`]
#[inline]
pub fn unzigzag32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// ZigZag-encode an `i64`
#[inline]
pub fn zigzag64(value: i64) -> u64 {
    (value.wrapping_shl(1) ^ (value >> 63)) as u64
}

/// Invert [`zigzag64`]
#[inline]
pub fn unzigzag64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Write an `i32` as a ZigZag VarInt
#[inline]
pub fn write_varint_signed(buf: &mut BytesMut, value: i32) {
    write_varint(buf, zigzag32(value));
}

/// Read a ZigZag VarInt as an `i32`
#[inline]
pub fn read_varint_signed(buf: &mut BytesMut) -> Result<(i32, usize)> {
    let (raw, consumed) = read_varint(buf)?;
    Ok((unzigzag32(raw), consumed))
}

/// Write an `i64` as a ZigZag VarLong
#[inline]
pub fn write_varlong_signed(buf: &mut BytesMut, value: i64) {
    write_varlong(buf, zigzag64(value));
}

/// Read a ZigZag VarLong as an `i64`
#[inline]
pub fn read_varlong_signed(buf: &mut BytesMut) -> Result<(i64, usize)> {
    let (raw, consumed) = read_varlong(buf)?;
    Ok((unzigzag64(raw), consumed))
}
