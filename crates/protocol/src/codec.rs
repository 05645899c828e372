//! Endian-aware binary primitive codec
//!
//! [`WireReader`] and [`WireWriter`] layer typed field access over a
//! [`ByteSink`]. Fixed-width numerics honor the sink's [`Endianness`] so
//! packet code never special-cases byte order; VarInts pass through the
//! [`crate::varint`] codec byte-by-byte; strings are VarInt
//! byte-count-prefixed in the sink's [`TextEncoding`].
//!
//! Reads of 255 bytes or less go through a stack buffer; only larger
//! transfers allocate.

use crate::sink::{ByteSink, Endianness, TextEncoding};
use crate::varint;
use bytemuck::Pod;
use gamewire_core::{Result, WireError};

/// Reads of this size or smaller use a transient stack buffer.
const STACK_BUF_LEN: usize = 255;

/// Integer types usable as an enum's declared backing width
///
/// Sealed set: the fixed-width integers the codec knows how to move.
pub trait EnumRepr: Copy + private::Sealed {
    fn read_repr(reader: &mut WireReader<'_>) -> Result<Self>;
    fn write_repr(self, writer: &mut WireWriter<'_>) -> Result<()>;
}

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i8 {}
    impl Sealed for u16 {}
    impl Sealed for i16 {}
    impl Sealed for u32 {}
    impl Sealed for i32 {}
    impl Sealed for u64 {}
    impl Sealed for i64 {}
}

macro_rules! enum_repr_impl {
    ($ty:ty, $read:ident, $write:ident) => {
        impl EnumRepr for $ty {
            fn read_repr(reader: &mut WireReader<'_>) -> Result<Self> {
                reader.$read()
            }
            fn write_repr(self, writer: &mut WireWriter<'_>) -> Result<()> {
                writer.$write(self)
            }
        }
    };
}

enum_repr_impl!(u8, read_u8, write_u8);
enum_repr_impl!(i8, read_i8, write_i8);
enum_repr_impl!(u16, read_u16, write_u16);
enum_repr_impl!(i16, read_i16, write_i16);
enum_repr_impl!(u32, read_u32, write_u32);
enum_repr_impl!(i32, read_i32, write_i32);
enum_repr_impl!(u64, read_u64, write_u64);
enum_repr_impl!(i64, read_i64, write_i64);

/// Enum encoded on the wire at its declared backing integer width
///
/// The codec reads the backing integer and converts. Conversion is always
/// validated: an out-of-range value is an [`WireError::InvalidFormat`]
/// decode error, never an unchecked bit pattern. The declared `Repr` must
/// match what the peer writes; the codec cannot detect a width mismatch
/// between the two ends.
pub trait WireEnum: Sized + Copy {
    type Repr: EnumRepr;

    fn from_repr(repr: Self::Repr) -> Option<Self>;
    fn into_repr(self) -> Self::Repr;
}

/// Typed field reader over a byte sink
pub struct WireReader<'a> {
    sink: &'a mut dyn ByteSink,
}

impl<'a> WireReader<'a> {
    #[inline]
    pub fn new(sink: &'a mut dyn ByteSink) -> Self {
        Self { sink }
    }

    /// The sink's byte order for fixed-width fields
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.sink.endianness()
    }

    /// Fill `dst` completely or fail with [`WireError::ShortRead`]
    fn read_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < dst.len() {
            let n = self.sink.read(&mut dst[filled..])?;
            if n == 0 {
                return Err(WireError::ShortRead {
                    needed: dst.len(),
                    got: filled,
                });
            }
            filled += n;
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a boolean: `0` is false, anything else is true
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(match self.endianness() {
            Endianness::Little => u16::from_le_bytes(bytes),
            Endianness::Big => u16::from_be_bytes(bytes),
        })
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(match self.endianness() {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        })
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_array::<8>()?;
        Ok(match self.endianness() {
            Endianness::Little => u64::from_le_bytes(bytes),
            Endianness::Big => u64::from_be_bytes(bytes),
        })
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a half-precision float, widened to `f32`
    #[inline]
    pub fn read_f16(&mut self) -> Result<f32> {
        Ok(f16_bits_to_f32(self.read_u16()?))
    }

    /// Read a VarInt (1-5 bytes), one byte at a time
    ///
    /// Never consumes past the terminating byte.
    #[inline]
    pub fn read_varint(&mut self) -> Result<u32> {
        let sink = &mut self.sink;
        let (value, _) = varint::read_varint_from(|| {
            let mut byte = [0u8; 1];
            Ok((sink.read(&mut byte)? == 1).then(|| byte[0]))
        })?;
        Ok(value)
    }

    /// Read a VarLong (1-10 bytes), one byte at a time
    #[inline]
    pub fn read_varlong(&mut self) -> Result<u64> {
        let sink = &mut self.sink;
        let (value, _) = varint::read_varlong_from(|| {
            let mut byte = [0u8; 1];
            Ok((sink.read(&mut byte)? == 1).then(|| byte[0]))
        })?;
        Ok(value)
    }

    /// Read a ZigZag VarInt as an `i32`
    #[inline]
    pub fn read_varint_signed(&mut self) -> Result<i32> {
        Ok(varint::unzigzag32(self.read_varint()?))
    }

    /// Read a ZigZag VarLong as an `i64`
    #[inline]
    pub fn read_varlong_signed(&mut self) -> Result<i64> {
        Ok(varint::unzigzag64(self.read_varlong()?))
    }

    /// Read a length-prefixed string
    ///
    /// The prefix is a VarInt of the encoded *byte* count. A zero prefix
    /// decodes to the empty string, never an absent value.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        if len == 0 {
            return Ok(String::new());
        }

        let encoding = self.sink.encoding();
        if len <= STACK_BUF_LEN {
            let mut stack = [0u8; STACK_BUF_LEN];
            self.read_exact(&mut stack[..len])?;
            decode_text(&stack[..len], encoding)
        } else {
            let mut heap = vec![0u8; len];
            self.read_exact(&mut heap)?;
            decode_text(&heap, encoding)
        }
    }

    /// Read an enum at its declared backing integer width
    ///
    /// # Errors
    /// [`WireError::InvalidFormat`] if the decoded integer is not a valid
    /// variant of `E`.
    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E> {
        let repr = E::Repr::read_repr(self)?;
        E::from_repr(repr).ok_or_else(|| {
            WireError::InvalidFormat(format!(
                "value out of range for enum {}",
                std::any::type_name::<E>()
            ))
        })
    }

    /// Read a plain-old-data struct as its exact byte image
    ///
    /// The image is host byte order with the struct's `#[repr(C)]` layout;
    /// the sink's `Endianness` is not applied. Use field-wise reads when
    /// the two ends may differ.
    pub fn read_pod<T: Pod>(&mut self) -> Result<T> {
        let len = std::mem::size_of::<T>();
        if len <= STACK_BUF_LEN {
            let mut stack = [0u8; STACK_BUF_LEN];
            self.read_exact(&mut stack[..len])?;
            Ok(bytemuck::pod_read_unaligned(&stack[..len]))
        } else {
            let mut heap = vec![0u8; len];
            self.read_exact(&mut heap)?;
            Ok(bytemuck::pod_read_unaligned(&heap))
        }
    }
}

/// Typed field writer over a byte sink
pub struct WireWriter<'a> {
    sink: &'a mut dyn ByteSink,
}

impl<'a> WireWriter<'a> {
    #[inline]
    pub fn new(sink: &'a mut dyn ByteSink) -> Self {
        Self { sink }
    }

    /// The sink's byte order for fixed-width fields
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.sink.endianness()
    }

    /// Write all of `src` or fail with [`WireError::ShortWrite`]
    fn write_all(&mut self, src: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < src.len() {
            let n = self.sink.write(&src[written..])?;
            if n == 0 {
                return Err(WireError::ShortWrite {
                    needed: src.len(),
                    wrote: written,
                });
            }
            written += n;
        }
        Ok(())
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let bytes = match self.endianness() {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.write_all(&bytes)
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_u16(value as u16)
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let bytes = match self.endianness() {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.write_all(&bytes)
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_u32(value as u32)
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let bytes = match self.endianness() {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.write_all(&bytes)
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_u64(value as u64)
    }

    #[inline]
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// Write an `f32` narrowed to half precision (round to nearest)
    #[inline]
    pub fn write_f16(&mut self, value: f32) -> Result<()> {
        self.write_u16(f32_to_f16_bits(value))
    }

    /// Write a `u32` as a VarInt (1-5 bytes)
    #[inline]
    pub fn write_varint(&mut self, value: u32) -> Result<()> {
        let mut scratch = bytes::BytesMut::with_capacity(varint::MAX_VARINT_LEN);
        varint::write_varint(&mut scratch, value);
        self.write_all(&scratch)
    }

    /// Write a `u64` as a VarLong (1-10 bytes)
    #[inline]
    pub fn write_varlong(&mut self, value: u64) -> Result<()> {
        let mut scratch = bytes::BytesMut::with_capacity(varint::MAX_VARLONG_LEN);
        varint::write_varlong(&mut scratch, value);
        self.write_all(&scratch)
    }

    /// Write an `i32` as a ZigZag VarInt
    #[inline]
    pub fn write_varint_signed(&mut self, value: i32) -> Result<()> {
        self.write_varint(varint::zigzag32(value))
    }

    /// Write an `i64` as a ZigZag VarLong
    #[inline]
    pub fn write_varlong_signed(&mut self, value: i64) -> Result<()> {
        self.write_varlong(varint::zigzag64(value))
    }

    /// Write a string as a VarInt byte-count prefix plus encoded bytes
    ///
    /// The empty string writes a single `0x00` prefix byte.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let encoding = self.sink.encoding();
        match encoding {
            TextEncoding::Utf8 => {
                let bytes = value.as_bytes();
                self.write_varint(bytes.len() as u32)?;
                self.write_all(bytes)
            }
            TextEncoding::Latin1 => {
                let mut bytes = Vec::with_capacity(value.len());
                for ch in value.chars() {
                    let code = ch as u32;
                    if code > 0xFF {
                        return Err(WireError::InvalidFormat(format!(
                            "character {ch:?} not representable in Latin-1"
                        )));
                    }
                    bytes.push(code as u8);
                }
                self.write_varint(bytes.len() as u32)?;
                self.write_all(&bytes)
            }
        }
    }

    /// Write an enum at its declared backing integer width
    pub fn write_enum<E: WireEnum>(&mut self, value: E) -> Result<()> {
        value.into_repr().write_repr(self)
    }

    /// Write a plain-old-data struct as its exact byte image (host order)
    pub fn write_pod<T: Pod>(&mut self, value: &T) -> Result<()> {
        self.write_all(bytemuck::bytes_of(value))
    }
}

fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| WireError::InvalidFormat(format!("invalid UTF-8: {e}"))),
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Narrow an `f32` to IEEE 754 binary16 bits, rounding to nearest
fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xFF) as i32;
    let man = bits & 0x007F_FFFF;

    if exp == 0xFF {
        // Inf or NaN; preserve NaN-ness with a quiet payload
        let nan = if man != 0 { 0x0200 } else { 0 };
        return sign | 0x7C00 | nan;
    }

    let unbiased = exp - 127;
    if unbiased > 15 {
        return sign | 0x7C00; // overflow to infinity
    }
    if unbiased < -24 {
        return sign; // underflow to signed zero
    }
    if unbiased < -14 {
        // Subnormal half: the implicit leading 1 becomes explicit
        let full = man | 0x0080_0000;
        let shift = (-14 - unbiased) as u32;
        let half_man = (full >> (13 + shift)) as u16;
        let round = ((full >> (12 + shift)) & 1) as u16;
        return sign | (half_man + round);
    }

    let half_exp = ((unbiased + 15) as u32) << 10;
    let half_man = man >> 13;
    let round = (man >> 12) & 1;
    // Rounding may carry into the exponent; the carried value is still
    // the correctly rounded result (including carry into infinity).
    sign | ((half_exp | half_man) + round) as u16
}

/// Widen IEEE 754 binary16 bits to an `f32`
fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = ((bits & 0x8000) as u32) << 16;
    let exp = ((bits >> 10) & 0x1F) as u32;
    let man = (bits & 0x03FF) as u32;

    let out = if exp == 0 {
        if man == 0 {
            sign
        } else {
            // Subnormal half: normalize into an f32 exponent
            let mut exp = 113u32;
            let mut man = man;
            while man & 0x0400 == 0 {
                man <<= 1;
                exp -= 1;
            }
            sign | (exp << 23) | ((man & 0x03FF) << 13)
        }
    } else if exp == 0x1F {
        sign | 0x7F80_0000 | (man << 13)
    } else {
        sign | ((exp + 112) << 23) | (man << 13)
    };
    f32::from_bits(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn sink(endianness: Endianness) -> MemorySink {
        MemorySink::new(endianness)
    }

    #[test]
    fn test_fixed_width_roundtrip_both_endians() {
        for endianness in [Endianness::Little, Endianness::Big] {
            let mut s = sink(endianness);
            {
                let mut w = WireWriter::new(&mut s);
                w.write_bool(true).unwrap();
                w.write_u8(0xAB).unwrap();
                w.write_i8(-5).unwrap();
                w.write_u16(0xBEEF).unwrap();
                w.write_i16(-1234).unwrap();
                w.write_u32(0xDEAD_BEEF).unwrap();
                w.write_i32(i32::MIN).unwrap();
                w.write_u64(0x0123_4567_89AB_CDEF).unwrap();
                w.write_i64(i64::MIN).unwrap();
                w.write_f32(3.5).unwrap();
                w.write_f64(-2.25).unwrap();
            }
            let mut r = WireReader::new(&mut s);
            assert!(r.read_bool().unwrap());
            assert_eq!(r.read_u8().unwrap(), 0xAB);
            assert_eq!(r.read_i8().unwrap(), -5);
            assert_eq!(r.read_u16().unwrap(), 0xBEEF);
            assert_eq!(r.read_i16().unwrap(), -1234);
            assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
            assert_eq!(r.read_i32().unwrap(), i32::MIN);
            assert_eq!(r.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
            assert_eq!(r.read_i64().unwrap(), i64::MIN);
            assert_eq!(r.read_f32().unwrap(), 3.5);
            assert_eq!(r.read_f64().unwrap(), -2.25);
        }
    }

    #[test]
    fn test_byte_order_matches_endianness() {
        let mut le = sink(Endianness::Little);
        WireWriter::new(&mut le).write_u16(0x1234).unwrap();
        assert_eq!(le.as_bytes(), &[0x34, 0x12]);

        let mut be = sink(Endianness::Big);
        WireWriter::new(&mut be).write_u16(0x1234).unwrap();
        assert_eq!(be.as_bytes(), &[0x12, 0x34]);

        let mut be = sink(Endianness::Big);
        WireWriter::new(&mut be).write_u32(0x0A0B_0C0D).unwrap();
        assert_eq!(be.as_bytes(), &[0x0A, 0x0B, 0x0C, 0x0D]);
    }

    #[test]
    fn test_short_read_on_truncated_field() {
        let mut s = sink(Endianness::Little);
        s.write(&[0x01, 0x02]).unwrap();

        let mut r = WireReader::new(&mut s);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            WireError::ShortRead { needed: 4, got: 2 }
        ));
    }

    #[test]
    fn test_varint_through_sink() {
        let mut s = sink(Endianness::Big);
        {
            let mut w = WireWriter::new(&mut s);
            w.write_varint(300).unwrap();
            w.write_varlong(u64::MAX).unwrap();
            w.write_varint_signed(-7).unwrap();
            w.write_varlong_signed(i64::MIN).unwrap();
        }
        let mut r = WireReader::new(&mut s);
        assert_eq!(r.read_varint().unwrap(), 300);
        assert_eq!(r.read_varlong().unwrap(), u64::MAX);
        assert_eq!(r.read_varint_signed().unwrap(), -7);
        assert_eq!(r.read_varlong_signed().unwrap(), i64::MIN);
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_varint_read_stops_at_terminator() {
        let mut s = sink(Endianness::Little);
        s.write(&[0xAC, 0x02, 0x99]).unwrap();

        let mut r = WireReader::new(&mut s);
        assert_eq!(r.read_varint().unwrap(), 300);
        // The byte after the terminator is still in the sink
        assert_eq!(r.read_u8().unwrap(), 0x99);
    }

    #[test]
    fn test_empty_string_is_single_zero_byte() {
        let mut s = sink(Endianness::Little);
        WireWriter::new(&mut s).write_string("").unwrap();
        assert_eq!(s.as_bytes(), &[0x00]);

        let decoded = WireReader::new(&mut s).read_string().unwrap();
        assert_eq!(decoded, "");
    }

    #[test]
    fn test_string_roundtrip_small_and_large() {
        // Small path (stack buffer) and large path (heap buffer)
        let small = "hello wire";
        let large = "x".repeat(300);

        for text in [small, large.as_str()] {
            let mut s = sink(Endianness::Big);
            WireWriter::new(&mut s).write_string(text).unwrap();
            let decoded = WireReader::new(&mut s).read_string().unwrap();
            assert_eq!(decoded, text);
        }
    }

    #[test]
    fn test_string_prefix_counts_bytes_not_chars() {
        let text = "héllo"; // 5 chars, 6 UTF-8 bytes
        let mut s = sink(Endianness::Little);
        WireWriter::new(&mut s).write_string(text).unwrap();
        assert_eq!(s.as_bytes()[0], 6);
    }

    #[test]
    fn test_latin1_string_roundtrip() {
        let mut s = sink(Endianness::Little).with_encoding(TextEncoding::Latin1);
        WireWriter::new(&mut s).write_string("café").unwrap();
        // 4 chars, 4 Latin-1 bytes
        assert_eq!(s.as_bytes()[0], 4);

        let decoded = WireReader::new(&mut s).read_string().unwrap();
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        let mut s = sink(Endianness::Little).with_encoding(TextEncoding::Latin1);
        let err = WireWriter::new(&mut s).write_string("日本").unwrap_err();
        assert!(matches!(err, WireError::InvalidFormat(_)));
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let mut s = sink(Endianness::Little);
        s.write(&[0x02, 0xFF, 0xFE]).unwrap();
        let err = WireReader::new(&mut s).read_string().unwrap_err();
        assert!(matches!(err, WireError::InvalidFormat(_)));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u16)]
    enum Weather {
        Clear = 0,
        Rain = 1,
        Storm = 900,
    }

    impl WireEnum for Weather {
        type Repr = u16;

        fn from_repr(repr: u16) -> Option<Self> {
            match repr {
                0 => Some(Self::Clear),
                1 => Some(Self::Rain),
                900 => Some(Self::Storm),
                _ => None,
            }
        }

        fn into_repr(self) -> u16 {
            self as u16
        }
    }

    #[test]
    fn test_enum_roundtrip_at_backing_width() {
        let mut s = sink(Endianness::Big);
        WireWriter::new(&mut s).write_enum(Weather::Storm).unwrap();
        assert_eq!(s.remaining(), 2);

        let decoded: Weather = WireReader::new(&mut s).read_enum().unwrap();
        assert_eq!(decoded, Weather::Storm);
    }

    #[test]
    fn test_enum_out_of_range_is_validated() {
        let mut s = sink(Endianness::Big);
        WireWriter::new(&mut s).write_u16(777).unwrap();

        let err = WireReader::new(&mut s).read_enum::<Weather>().unwrap_err();
        assert!(matches!(err, WireError::InvalidFormat(_)));
    }

    #[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Vec2 {
        x: f32,
        y: f32,
    }

    #[test]
    fn test_pod_roundtrip() {
        let original = Vec2 { x: 1.5, y: -8.25 };
        let mut s = sink(Endianness::Little);
        WireWriter::new(&mut s).write_pod(&original).unwrap();
        assert_eq!(s.remaining(), std::mem::size_of::<Vec2>());

        let decoded: Vec2 = WireReader::new(&mut s).read_pod().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_f16_roundtrip_exact_values() {
        // Values exactly representable in binary16
        for val in [0.0f32, -0.0, 1.0, -2.5, 0.5, 1024.0, 65504.0, -65504.0] {
            let mut s = sink(Endianness::Little);
            WireWriter::new(&mut s).write_f16(val).unwrap();
            let decoded = WireReader::new(&mut s).read_f16().unwrap();
            assert_eq!(decoded, val, "Failed for {}", val);
            assert_eq!(decoded.is_sign_negative(), val.is_sign_negative());
        }
    }

    #[test]
    fn test_f16_specials() {
        let mut s = sink(Endianness::Little);
        {
            let mut w = WireWriter::new(&mut s);
            w.write_f16(f32::INFINITY).unwrap();
            w.write_f16(f32::NEG_INFINITY).unwrap();
            w.write_f16(f32::NAN).unwrap();
            w.write_f16(1e10).unwrap(); // overflows binary16
        }
        let mut r = WireReader::new(&mut s);
        assert_eq!(r.read_f16().unwrap(), f32::INFINITY);
        assert_eq!(r.read_f16().unwrap(), f32::NEG_INFINITY);
        assert!(r.read_f16().unwrap().is_nan());
        assert_eq!(r.read_f16().unwrap(), f32::INFINITY);
    }

    #[test]
    fn test_f16_subnormal_roundtrip() {
        // Smallest positive binary16 subnormal: 2^-24
        let tiny = 2.0f32.powi(-24);
        let mut s = sink(Endianness::Big);
        WireWriter::new(&mut s).write_f16(tiny).unwrap();
        assert_eq!(WireReader::new(&mut s).read_f16().unwrap(), tiny);
    }
}
