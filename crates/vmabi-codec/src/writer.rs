use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::dispatch::{Codec, Context};
use crate::error::{CodecError, Result};
use crate::value::Value;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes encoded values to any `Write` stream.
pub struct ValueWriter<T> {
    inner: T,
    buf: BytesMut,
    codec: Codec,
}

impl<T: Write> ValueWriter<T> {
    /// Create a new value writer with the default codec.
    pub fn new(inner: T) -> Self {
        Self::with_codec(inner, Codec::new())
    }

    /// Create a new value writer with an explicit codec.
    pub fn with_codec(inner: T, codec: Codec) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            codec,
        }
    }

    /// Encode `value` nested and write it (blocking).
    pub fn write_nested(&mut self, value: &Value) -> Result<()> {
        self.write_value(value, Context::Nested)
    }

    /// Encode `value` top-level and write it (blocking).
    pub fn write_top_level(&mut self, value: &Value) -> Result<()> {
        self.write_value(value, Context::TopLevel)
    }

    /// Encode `value` in `ctx` and write it (blocking).
    ///
    /// Nothing is written if encoding fails.
    pub fn write_value(&mut self, value: &Value, ctx: Context) -> Result<()> {
        self.buf.clear();
        self.codec.encode(value, ctx, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(CodecError::StreamClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Codec used for encoding.
    pub fn codec(&self) -> &Codec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::dispatch::decode_nested;

    #[test]
    fn write_single_value() {
        let mut writer = ValueWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_nested(&Value::U32(258)).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, vec![0, 0, 1, 2]);
    }

    #[test]
    fn write_multiple_values() {
        let mut writer = ValueWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_nested(&Value::String("one".into())).unwrap();
        writer.write_nested(&Value::I8(-1)).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut src: &[u8] = &wire;
        let mut first = Value::String(String::new());
        let mut second = Value::I8(0);
        decode_nested(&mut first, &mut src).unwrap();
        decode_nested(&mut second, &mut src).unwrap();
        assert_eq!(first, Value::String("one".into()));
        assert_eq!(second, Value::I8(-1));
    }

    #[test]
    fn top_level_default_writes_nothing() {
        let mut writer = ValueWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_top_level(&Value::Bool(false)).unwrap();
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn encode_failure_writes_nothing() {
        let mut writer = ValueWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer
            .write_nested(&Value::Address(vec![1; 31]))
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidLength { .. }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn zero_length_write_reports_closed() {
        let mut writer = ValueWriter::new(ZeroWriter);
        let err = writer.write_nested(&Value::U8(1)).unwrap_err();
        assert!(matches!(err, CodecError::StreamClosed));
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = ValueWriter::new(sink);

        writer.write_nested(&Value::U8(1)).unwrap();
        assert!(flag.load(Ordering::SeqCst));
        assert_eq!(writer.get_ref().data, vec![1]);
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        data: Vec<u8>,
        flushed: Arc<AtomicBool>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}
