use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::dispatch::Codec;
use crate::error::{CodecError, Result};
use crate::value::Value;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Decodes values from any `Read` stream.
///
/// Handles partial reads internally: a nested value is decoded once enough
/// bytes have arrived, and only then consumed from the buffer. After a short
/// read the reader waits for the whole shortfall before decoding again, so a
/// large length-prefixed payload costs one retry rather than one per chunk.
pub struct ValueReader<T> {
    inner: T,
    buf: BytesMut,
    codec: Codec,
    eof: bool,
    #[cfg(test)]
    decode_passes: usize,
}

impl<T: Read> ValueReader<T> {
    /// Create a new value reader with the default codec.
    pub fn new(inner: T) -> Self {
        Self::with_codec(inner, Codec::new())
    }

    /// Create a new value reader with an explicit codec.
    pub fn with_codec(inner: T, codec: Codec) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            codec,
            eof: false,
            #[cfg(test)]
            decode_passes: 0,
        }
    }

    /// Decode the next nested value into `target` (blocking).
    ///
    /// Returns `Err(CodecError::StreamClosed)` when EOF is reached before
    /// the value starts, or the `ShortRead` error when EOF cuts it off.
    pub fn read_nested(&mut self, target: &mut Value) -> Result<()> {
        loop {
            #[cfg(test)]
            {
                self.decode_passes += 1;
            }
            let mut view = &self.buf[..];
            let err = match self.codec.decode_nested(target, &mut view) {
                Ok(()) => {
                    let consumed = self.buf.len() - view.len();
                    self.buf.advance(consumed);
                    return Ok(());
                }
                Err(err) => err,
            };

            // Field errors wrap the cause, so look through them.
            let shortfall = match err.root_cause() {
                CodecError::ShortRead { needed, available } => {
                    needed.saturating_sub(*available).max(1)
                }
                _ => return Err(err),
            };
            if self.eof {
                if self.buf.is_empty() {
                    return Err(CodecError::StreamClosed);
                }
                return Err(err);
            }
            self.fill_by(shortfall)?;
        }
    }

    /// Read the stream to EOF and decode it as one top-level payload.
    pub fn read_top_level(&mut self, target: &mut Value) -> Result<()> {
        while !self.eof {
            self.fill()?;
        }
        let payload = self.buf.split().freeze();
        self.codec.decode_top_level(target, &payload)
    }

    /// Bytes received but not yet decoded.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Codec used for decoding.
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Read until `additional` more bytes are buffered or EOF.
    fn fill_by(&mut self, additional: usize) -> Result<()> {
        let target = self.buf.len() + additional;
        self.buf.reserve(additional);
        while self.buf.len() < target && !self.eof {
            self.fill()?;
        }
        Ok(())
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    trace!(read = n, buffered = self.buf.len(), "refilled value buffer");
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
    }
}
