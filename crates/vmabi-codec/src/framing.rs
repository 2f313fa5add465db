use bytes::{Buf, BufMut, BytesMut};

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::stream::need;

/// Length prefix size: 4 bytes, big-endian, unsigned.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Write a length prefix.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬─────────────────────┐
/// │ Length (4B BE)   │ Payload             │
/// │ unsigned         │ (Length units)      │
/// └──────────────────┴─────────────────────┘
/// ```
///
/// The unit is bytes for strings, byte buffers and big integers, and
/// elements for lists.
pub fn encode_length(length: usize, dst: &mut BytesMut) -> Result<()> {
    let length = u32::try_from(length).map_err(|_| CodecError::LengthOverflow(length))?;
    dst.put_u32(length);
    Ok(())
}

/// Read a length prefix.
pub fn decode_length<B: Buf>(src: &mut B) -> Result<u32> {
    need(src, LENGTH_PREFIX_SIZE)?;
    Ok(src.get_u32())
}

/// Read a length prefix and enforce the configured maximum.
pub fn decode_bounded_length<B: Buf>(src: &mut B, config: &CodecConfig) -> Result<usize> {
    let len = decode_length(src)? as usize;
    if len > config.max_length {
        return Err(CodecError::LengthExceeded {
            len,
            max: config.max_length,
        });
    }
    Ok(len)
}

/// Write a length prefix followed by the payload.
pub fn encode_prefixed(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
    encode_length(payload.len(), dst)?;
    dst.put_slice(payload);
    Ok(())
}
