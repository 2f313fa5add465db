//! Codecs for leaf values: booleans, integers, big integers, strings, byte
//! buffers and addresses.
//!
//! Nested encodings are self-delimiting. Top-level encodings assume the
//! payload is the whole message: top-level decoders consume everything left
//! in the source.

use bytes::{Buf, BufMut, BytesMut};
use num_bigint::{BigInt, BigUint, Sign};

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::framing::{decode_bounded_length, encode_prefixed};
use crate::stream::{check_length, read_array, read_exact, read_remaining, read_u8};
use crate::value::ADDRESS_LEN;

// ---------------------------------------------------------------------------
// Bool
// ---------------------------------------------------------------------------

pub fn encode_bool_nested(value: bool, dst: &mut BytesMut) {
    dst.put_u8(u8::from(value));
}

pub fn decode_bool_nested<B: Buf>(src: &mut B) -> Result<bool> {
    bool_from_byte(read_u8(src)?)
}

/// `false` is the empty payload, `true` is `[0x01]`.
pub fn encode_bool_top_level(value: bool, dst: &mut BytesMut) {
    if value {
        dst.put_u8(1);
    }
}

pub fn decode_bool_top_level<B: Buf>(src: &mut B) -> Result<bool> {
    match src.remaining() {
        0 => Ok(false),
        1 => bool_from_byte(src.get_u8()),
        n => Err(CodecError::InvalidBoolLength(n)),
    }
}

fn bool_from_byte(byte: u8) -> Result<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CodecError::InvalidBool(other)),
    }
}

// ---------------------------------------------------------------------------
// Fixed-width integers
// ---------------------------------------------------------------------------

/// A fixed-width integer with both encodings.
pub trait FixedWidth: Sized + Copy {
    /// Size of the nested encoding in bytes.
    const WIDTH: usize;
    /// Type name used in range errors.
    const NAME: &'static str;

    /// Big-endian, exactly [`Self::WIDTH`] bytes.
    fn encode_nested(self, dst: &mut BytesMut);

    fn decode_nested<B: Buf>(src: &mut B) -> Result<Self>;

    /// Minimal big-endian magnitude; zero is the empty payload. Negative
    /// signed values have no magnitude form and fail with
    /// [`CodecError::NegativeTopLevel`].
    fn encode_top_level(self, dst: &mut BytesMut) -> Result<()>;

    /// Rebuild from a minimal (or padded) magnitude, failing when the value
    /// is above the type's maximum.
    fn decode_top_level(payload: &[u8]) -> Result<Self>;
}

macro_rules! fixed_width_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl FixedWidth for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            const NAME: &'static str = stringify!($ty);

            fn encode_nested(self, dst: &mut BytesMut) {
                dst.put_slice(&self.to_be_bytes());
            }

            fn decode_nested<B: Buf>(src: &mut B) -> Result<Self> {
                Ok(<$ty>::from_be_bytes(read_array(src)?))
            }

            fn encode_top_level(self, dst: &mut BytesMut) -> Result<()> {
                dst.put_slice(trim_magnitude(&self.to_be_bytes()));
                Ok(())
            }

            fn decode_top_level(payload: &[u8]) -> Result<Self> {
                let magnitude = BigUint::from_bytes_be(payload);
                <$ty>::try_from(&magnitude).map_err(|_| CodecError::Overflow { ty: Self::NAME })
            }
        }
    )*};
}

macro_rules! fixed_width_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl FixedWidth for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            const NAME: &'static str = stringify!($ty);

            fn encode_nested(self, dst: &mut BytesMut) {
                dst.put_slice(&self.to_be_bytes());
            }

            fn decode_nested<B: Buf>(src: &mut B) -> Result<Self> {
                Ok(<$ty>::from_be_bytes(read_array(src)?))
            }

            // Same magnitude path as the unsigned types. There is no sign
            // byte, so only non-negative values are representable.
            fn encode_top_level(self, dst: &mut BytesMut) -> Result<()> {
                if self < 0 {
                    return Err(CodecError::NegativeTopLevel { ty: Self::NAME });
                }
                dst.put_slice(trim_magnitude(&self.to_be_bytes()));
                Ok(())
            }

            fn decode_top_level(payload: &[u8]) -> Result<Self> {
                let magnitude = BigUint::from_bytes_be(payload);
                <$ty>::try_from(&magnitude).map_err(|_| CodecError::Overflow { ty: Self::NAME })
            }
        }
    )*};
}

fixed_width_unsigned!(u8, u16, u32, u64);
fixed_width_signed!(i8, i16, i32, i64);

/// Strip leading zero bytes. An all-zero input becomes empty.
fn trim_magnitude(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

// ---------------------------------------------------------------------------
// Big integers
// ---------------------------------------------------------------------------

/// Minimal big-endian magnitude; zero is empty.
pub fn biguint_to_bytes(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 {
        return Vec::new();
    }
    value.to_bytes_be()
}

/// Minimal two's-complement bytes; zero is empty.
pub fn bigint_to_bytes(value: &BigInt) -> Vec<u8> {
    if value.sign() == Sign::NoSign {
        return Vec::new();
    }
    value.to_signed_bytes_be()
}

pub fn encode_biguint_nested(value: &BigUint, dst: &mut BytesMut) -> Result<()> {
    encode_prefixed(&biguint_to_bytes(value), dst)
}

pub fn decode_biguint_nested<B: Buf>(src: &mut B, config: &CodecConfig) -> Result<BigUint> {
    let payload = read_prefixed(src, config)?;
    Ok(BigUint::from_bytes_be(&payload))
}

pub fn encode_biguint_top_level(value: &BigUint, dst: &mut BytesMut) {
    dst.put_slice(&biguint_to_bytes(value));
}

pub fn decode_biguint_top_level<B: Buf>(src: &mut B) -> BigUint {
    BigUint::from_bytes_be(&read_remaining(src))
}

pub fn encode_bigint_nested(value: &BigInt, dst: &mut BytesMut) -> Result<()> {
    encode_prefixed(&bigint_to_bytes(value), dst)
}

pub fn decode_bigint_nested<B: Buf>(src: &mut B, config: &CodecConfig) -> Result<BigInt> {
    let payload = read_prefixed(src, config)?;
    Ok(BigInt::from_signed_bytes_be(&payload))
}

pub fn encode_bigint_top_level(value: &BigInt, dst: &mut BytesMut) {
    dst.put_slice(&bigint_to_bytes(value));
}

pub fn decode_bigint_top_level<B: Buf>(src: &mut B) -> BigInt {
    BigInt::from_signed_bytes_be(&read_remaining(src))
}

// ---------------------------------------------------------------------------
// Strings and byte buffers
// ---------------------------------------------------------------------------

pub fn encode_bytes_nested(value: &[u8], dst: &mut BytesMut) -> Result<()> {
    encode_prefixed(value, dst)
}

pub fn decode_bytes_nested<B: Buf>(src: &mut B, config: &CodecConfig) -> Result<Vec<u8>> {
    Ok(read_prefixed(src, config)?.to_vec())
}

pub fn encode_bytes_top_level(value: &[u8], dst: &mut BytesMut) {
    dst.put_slice(value);
}

pub fn decode_bytes_top_level<B: Buf>(src: &mut B) -> Vec<u8> {
    read_remaining(src).to_vec()
}

pub fn decode_string_nested<B: Buf>(src: &mut B, config: &CodecConfig) -> Result<String> {
    Ok(String::from_utf8(decode_bytes_nested(src, config)?)?)
}

pub fn decode_string_top_level<B: Buf>(src: &mut B) -> Result<String> {
    Ok(String::from_utf8(decode_bytes_top_level(src))?)
}

fn read_prefixed<B: Buf>(src: &mut B, config: &CodecConfig) -> Result<bytes::Bytes> {
    let len = decode_bounded_length(src, config)?;
    read_exact(src, len)
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Same representation nested and top-level: 32 raw bytes.
pub fn encode_address(value: &[u8], dst: &mut BytesMut) -> Result<()> {
    check_length("address", value.len(), ADDRESS_LEN)?;
    dst.put_slice(value);
    Ok(())
}

pub fn decode_address_nested<B: Buf>(src: &mut B) -> Result<Vec<u8>> {
    Ok(read_exact(src, ADDRESS_LEN)?.to_vec())
}

pub fn decode_address_top_level<B: Buf>(src: &mut B) -> Result<Vec<u8>> {
    check_length("address", src.remaining(), ADDRESS_LEN)?;
    decode_address_nested(src)
}
