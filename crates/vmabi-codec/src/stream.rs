//! Byte-stream primitives shared by every codec.
//!
//! Input is any [`Buf`]; nothing is consumed when a read fails.

use bytes::{Buf, Bytes};

use crate::error::{CodecError, Result};

/// Fail with [`CodecError::ShortRead`] unless `n` bytes are available.
#[inline]
pub fn need<B: Buf>(src: &B, n: usize) -> Result<()> {
    let available = src.remaining();
    if available < n {
        return Err(CodecError::ShortRead {
            needed: n,
            available,
        });
    }
    Ok(())
}

/// Read exactly `n` bytes.
pub fn read_exact<B: Buf>(src: &mut B, n: usize) -> Result<Bytes> {
    need(src, n)?;
    Ok(src.copy_to_bytes(n))
}

/// Read a fixed-size array.
pub fn read_array<B: Buf, const N: usize>(src: &mut B) -> Result<[u8; N]> {
    need(src, N)?;
    let mut out = [0u8; N];
    src.copy_to_slice(&mut out);
    Ok(out)
}

/// Read a single byte.
pub fn read_u8<B: Buf>(src: &mut B) -> Result<u8> {
    need(src, 1)?;
    Ok(src.get_u8())
}

/// Drain everything left in the source.
pub fn read_remaining<B: Buf>(src: &mut B) -> Bytes {
    let n = src.remaining();
    src.copy_to_bytes(n)
}

/// Validate the size of a fixed-length field.
pub fn check_length(kind: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(CodecError::InvalidLength {
            kind,
            actual,
            expected,
        });
    }
    Ok(())
}
