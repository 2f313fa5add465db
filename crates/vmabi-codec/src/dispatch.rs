use bytes::{Buf, Bytes, BytesMut};

use crate::composite;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::primitives::{self, FixedWidth};
use crate::stream::read_remaining;
use crate::value::Value;

/// Encoding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Self-delimiting form, used inside another value.
    Nested,
    /// Minimal form, used when the value is the entire payload.
    TopLevel,
}

/// Routes values to their codecs.
///
/// `Codec` holds only configuration, so one instance can serve any number
/// of concurrent calls on independent streams and values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Current codec configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `value` in `ctx`, appending to `dst`.
    pub fn encode(&self, value: &Value, ctx: Context, dst: &mut BytesMut) -> Result<()> {
        use Context::{Nested, TopLevel};

        match value {
            Value::Bool(v) => match ctx {
                Nested => primitives::encode_bool_nested(*v, dst),
                TopLevel => primitives::encode_bool_top_level(*v, dst),
            },
            Value::U8(v) => encode_fixed(*v, ctx, dst)?,
            Value::U16(v) => encode_fixed(*v, ctx, dst)?,
            Value::U32(v) => encode_fixed(*v, ctx, dst)?,
            Value::U64(v) => encode_fixed(*v, ctx, dst)?,
            Value::I8(v) => encode_fixed(*v, ctx, dst)?,
            Value::I16(v) => encode_fixed(*v, ctx, dst)?,
            Value::I32(v) => encode_fixed(*v, ctx, dst)?,
            Value::I64(v) => encode_fixed(*v, ctx, dst)?,
            Value::BigUint(v) => match ctx {
                Nested => primitives::encode_biguint_nested(v, dst)?,
                TopLevel => primitives::encode_biguint_top_level(v, dst),
            },
            Value::BigInt(v) => match ctx {
                Nested => primitives::encode_bigint_nested(v, dst)?,
                TopLevel => primitives::encode_bigint_top_level(v, dst),
            },
            Value::String(v) => match ctx {
                Nested => primitives::encode_bytes_nested(v.as_bytes(), dst)?,
                TopLevel => primitives::encode_bytes_top_level(v.as_bytes(), dst),
            },
            Value::Bytes(v) => match ctx {
                Nested => primitives::encode_bytes_nested(v, dst)?,
                TopLevel => primitives::encode_bytes_top_level(v, dst),
            },
            Value::Address(v) => primitives::encode_address(v, dst)?,
            Value::Option(v) => match ctx {
                Nested => composite::encode_option_nested(self, v.as_deref(), dst)?,
                TopLevel => composite::encode_option_top_level(self, v.as_deref(), dst)?,
            },
            Value::InputList(items) => self.encode_list(items, ctx, dst)?,
            Value::OutputList(list) => self.encode_list(&list.items, ctx, dst)?,
            Value::Struct(s) => composite::encode_fields(self, &s.fields, dst)?,
            Value::Enum(e) => match ctx {
                Nested => composite::encode_enum_nested(self, e, dst)?,
                TopLevel => composite::encode_enum_top_level(self, e, dst)?,
            },
        }
        Ok(())
    }

    /// Decode from `src` into `target` in `ctx`.
    ///
    /// `target` must already have the expected shape. In the top-level
    /// context, leaf decoders consume everything left in `src`.
    pub fn decode<B: Buf>(&self, target: &mut Value, ctx: Context, src: &mut B) -> Result<()> {
        use Context::{Nested, TopLevel};

        match target {
            Value::Bool(v) => {
                *v = match ctx {
                    Nested => primitives::decode_bool_nested(src)?,
                    TopLevel => primitives::decode_bool_top_level(src)?,
                }
            }
            Value::U8(v) => decode_fixed(v, ctx, src)?,
            Value::U16(v) => decode_fixed(v, ctx, src)?,
            Value::U32(v) => decode_fixed(v, ctx, src)?,
            Value::U64(v) => decode_fixed(v, ctx, src)?,
            Value::I8(v) => decode_fixed(v, ctx, src)?,
            Value::I16(v) => decode_fixed(v, ctx, src)?,
            Value::I32(v) => decode_fixed(v, ctx, src)?,
            Value::I64(v) => decode_fixed(v, ctx, src)?,
            Value::BigUint(v) => {
                *v = match ctx {
                    Nested => primitives::decode_biguint_nested(src, &self.config)?,
                    TopLevel => primitives::decode_biguint_top_level(src),
                }
            }
            Value::BigInt(v) => {
                *v = match ctx {
                    Nested => primitives::decode_bigint_nested(src, &self.config)?,
                    TopLevel => primitives::decode_bigint_top_level(src),
                }
            }
            Value::String(v) => {
                *v = match ctx {
                    Nested => primitives::decode_string_nested(src, &self.config)?,
                    TopLevel => primitives::decode_string_top_level(src)?,
                }
            }
            Value::Bytes(v) => {
                *v = match ctx {
                    Nested => primitives::decode_bytes_nested(src, &self.config)?,
                    TopLevel => primitives::decode_bytes_top_level(src),
                }
            }
            Value::Address(v) => {
                *v = match ctx {
                    Nested => primitives::decode_address_nested(src)?,
                    TopLevel => primitives::decode_address_top_level(src)?,
                }
            }
            Value::Option(v) => match ctx {
                Nested => composite::decode_option_nested(self, v, src)?,
                TopLevel => composite::decode_option_top_level(self, v, src)?,
            },
            // An input list carries no item factory.
            Value::InputList(_) => return Err(CodecError::MissingItemFactory),
            Value::OutputList(list) => match ctx {
                Nested => composite::decode_list_nested(self, list, src)?,
                TopLevel => composite::decode_list_top_level(self, list, src)?,
            },
            Value::Struct(s) => composite::decode_fields(self, &mut s.fields, src)?,
            Value::Enum(e) => match ctx {
                Nested => composite::decode_enum_nested(self, e, src)?,
                TopLevel => composite::decode_enum_top_level(self, e, src)?,
            },
        }
        Ok(())
    }

    /// Encode `value` in the nested context.
    pub fn encode_nested(&self, value: &Value) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.encode(value, Context::Nested, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Encode `value` in the top-level context.
    pub fn encode_top_level(&self, value: &Value) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.encode(value, Context::TopLevel, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Decode one nested value from `src`, leaving any following bytes.
    pub fn decode_nested<B: Buf>(&self, target: &mut Value, src: &mut B) -> Result<()> {
        self.decode(target, Context::Nested, src)
    }

    /// Decode `data` as one complete top-level payload.
    ///
    /// Fails with [`CodecError::TrailingBytes`] if the value does not use
    /// the whole payload.
    pub fn decode_top_level(&self, target: &mut Value, data: &[u8]) -> Result<()> {
        let mut src = data;
        self.decode(target, Context::TopLevel, &mut src)?;
        if !src.is_empty() {
            return Err(CodecError::TrailingBytes(src.len()));
        }
        Ok(())
    }

    fn encode_list(&self, items: &[Value], ctx: Context, dst: &mut BytesMut) -> Result<()> {
        match ctx {
            Context::Nested => composite::encode_list_nested(self, items, dst),
            Context::TopLevel => composite::encode_list_top_level(self, items, dst),
        }
    }
}

fn encode_fixed<T: FixedWidth>(value: T, ctx: Context, dst: &mut BytesMut) -> Result<()> {
    match ctx {
        Context::Nested => {
            value.encode_nested(dst);
            Ok(())
        }
        Context::TopLevel => value.encode_top_level(dst),
    }
}

fn decode_fixed<T: FixedWidth, B: Buf>(slot: &mut T, ctx: Context, src: &mut B) -> Result<()> {
    *slot = match ctx {
        Context::Nested => T::decode_nested(src)?,
        Context::TopLevel => T::decode_top_level(&read_remaining(src))?,
    };
    Ok(())
}

/// Encode `value` nested, with the default configuration.
pub fn encode_nested(value: &Value) -> Result<Bytes> {
    Codec::new().encode_nested(value)
}

/// Encode `value` top-level, with the default configuration.
pub fn encode_top_level(value: &Value) -> Result<Bytes> {
    Codec::new().encode_top_level(value)
}

/// Decode one nested value, with the default configuration.
pub fn decode_nested<B: Buf>(target: &mut Value, src: &mut B) -> Result<()> {
    Codec::new().decode_nested(target, src)
}

/// Decode a complete top-level payload, with the default configuration.
pub fn decode_top_level(target: &mut Value, data: &[u8]) -> Result<()> {
    Codec::new().decode_top_level(target, data)
}
