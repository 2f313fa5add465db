//! Codecs for options, lists, structs and enums.
//!
//! Each of these recurses into [`Codec::encode`]/[`Codec::decode`] for its
//! children, always in the nested context.

use bytes::{Buf, BufMut, BytesMut};
use tracing::{debug, trace};

use crate::dispatch::{Codec, Context};
use crate::error::{CodecError, Result};
use crate::framing::{decode_bounded_length, encode_length};
use crate::stream::read_u8;
use crate::value::{EnumValue, Field, OutputList, Value};

const OPTION_ABSENT: u8 = 0;
const OPTION_PRESENT: u8 = 1;

// ---------------------------------------------------------------------------
// Option
// ---------------------------------------------------------------------------

pub fn encode_option_nested(codec: &Codec, value: Option<&Value>, dst: &mut BytesMut) -> Result<()> {
    match value {
        None => dst.put_u8(OPTION_ABSENT),
        Some(inner) => {
            dst.put_u8(OPTION_PRESENT);
            codec.encode(inner, Context::Nested, dst)?;
        }
    }
    Ok(())
}

/// Reads the presence byte; `0` resets `target` to `None`, anything else
/// decodes into the existing inner target.
pub fn decode_option_nested<B: Buf>(
    codec: &Codec,
    target: &mut Option<Box<Value>>,
    src: &mut B,
) -> Result<()> {
    if read_u8(src)? == OPTION_ABSENT {
        *target = None;
        return Ok(());
    }
    let inner = target
        .as_deref_mut()
        .ok_or(CodecError::MissingOptionTarget)?;
    codec.decode(inner, Context::Nested, src)
}

/// An absent option is the empty payload.
pub fn encode_option_top_level(
    codec: &Codec,
    value: Option<&Value>,
    dst: &mut BytesMut,
) -> Result<()> {
    match value {
        None => Ok(()),
        Some(_) => encode_option_nested(codec, value, dst),
    }
}

pub fn decode_option_top_level<B: Buf>(
    codec: &Codec,
    target: &mut Option<Box<Value>>,
    src: &mut B,
) -> Result<()> {
    if !src.has_remaining() {
        *target = None;
        return Ok(());
    }
    decode_option_nested(codec, target, src)
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Element count followed by each element, nested.
pub fn encode_list_nested(codec: &Codec, items: &[Value], dst: &mut BytesMut) -> Result<()> {
    encode_length(items.len(), dst)?;
    encode_items(codec, items, dst)
}

/// Elements back to back, no count.
pub fn encode_list_top_level(codec: &Codec, items: &[Value], dst: &mut BytesMut) -> Result<()> {
    encode_items(codec, items, dst)
}

fn encode_items(codec: &Codec, items: &[Value], dst: &mut BytesMut) -> Result<()> {
    for item in items {
        codec.encode(item, Context::Nested, dst)?;
    }
    Ok(())
}

/// Replaces `list.items` with `count` elements, each built by the item
/// factory and decoded in place.
pub fn decode_list_nested<B: Buf>(codec: &Codec, list: &mut OutputList, src: &mut B) -> Result<()> {
    let Some(factory) = list.item_factory.clone() else {
        return Err(CodecError::MissingItemFactory);
    };
    let count = decode_bounded_length(src, codec.config())?;
    trace!(count, "decoding nested list");

    list.items.clear();
    // Every element takes at least one byte except zero-sized ones, so the
    // remaining input bounds a sane pre-allocation.
    list.items.reserve(count.min(src.remaining()));
    for _ in 0..count {
        let mut item = factory();
        codec.decode(&mut item, Context::Nested, src)?;
        list.items.push(item);
    }
    Ok(())
}

/// Decodes elements until the input is exhausted.
pub fn decode_list_top_level<B: Buf>(
    codec: &Codec,
    list: &mut OutputList,
    src: &mut B,
) -> Result<()> {
    let Some(factory) = list.item_factory.clone() else {
        return Err(CodecError::MissingItemFactory);
    };

    list.items.clear();
    while src.has_remaining() {
        let before = src.remaining();
        let mut item = factory();
        codec.decode(&mut item, Context::Nested, src)?;
        if src.remaining() == before {
            // zero-width element: stop instead of looping forever
            break;
        }
        list.items.push(item);
    }
    trace!(count = list.items.len(), "decoded top-level list");
    Ok(())
}

// ---------------------------------------------------------------------------
// Struct
// ---------------------------------------------------------------------------

/// Encodes fields in declared order. Nested and top-level are identical.
pub fn encode_fields(codec: &Codec, fields: &[Field], dst: &mut BytesMut) -> Result<()> {
    for field in fields {
        codec
            .encode(&field.value, Context::Nested, dst)
            .map_err(|err| err.in_field(field.name.as_str()))?;
    }
    Ok(())
}

/// Decodes into the existing fields, in order. Names are not checked.
pub fn decode_fields<B: Buf>(codec: &Codec, fields: &mut [Field], src: &mut B) -> Result<()> {
    for field in fields.iter_mut() {
        if let Err(err) = codec.decode(&mut field.value, Context::Nested, src) {
            debug!(field = %field.name, error = %err, "field decode failed");
            return Err(err.in_field(field.name.as_str()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

pub fn encode_enum_nested(codec: &Codec, value: &EnumValue, dst: &mut BytesMut) -> Result<()> {
    dst.put_u8(value.discriminant);
    encode_fields(codec, &value.fields, dst)
}

/// Discriminant 0 without fields is the empty payload.
pub fn encode_enum_top_level(codec: &Codec, value: &EnumValue, dst: &mut BytesMut) -> Result<()> {
    if value.discriminant == 0 && value.fields.is_empty() {
        return Ok(());
    }
    encode_enum_nested(codec, value, dst)
}

/// Reads the discriminant, then decodes the pre-set fields.
///
/// The field list must already describe the variant being decoded; it is
/// not looked up from the discriminant.
pub fn decode_enum_nested<B: Buf>(codec: &Codec, target: &mut EnumValue, src: &mut B) -> Result<()> {
    target.discriminant = read_u8(src)?;
    decode_fields(codec, &mut target.fields, src)
}

pub fn decode_enum_top_level<B: Buf>(
    codec: &Codec,
    target: &mut EnumValue,
    src: &mut B,
) -> Result<()> {
    if !src.has_remaining() {
        target.discriminant = 0;
        target.fields.clear();
        return Ok(());
    }
    decode_enum_nested(codec, target, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StructValue;

    fn codec() -> Codec {
        Codec::new()
    }

    #[test]
    fn option_nested_bytes() {
        let mut buf = BytesMut::new();
        encode_option_nested(&codec(), None, &mut buf).unwrap();
        encode_option_nested(&codec(), Some(&Value::U16(5)), &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x00, 0x01, 0x00, 0x05]);
    }

    #[test]
    fn option_decode_absent_clears_target() {
        let mut target = Some(Box::new(Value::U8(9)));
        let mut src: &[u8] = &[0x00];
        decode_option_nested(&codec(), &mut target, &mut src).unwrap();
        assert!(target.is_none());
    }

    #[test]
    fn option_decode_present_fills_target() {
        let mut target = Some(Box::new(Value::U16(0)));
        let mut src: &[u8] = &[0x01, 0x01, 0x02];
        decode_option_nested(&codec(), &mut target, &mut src).unwrap();
        assert_eq!(target.as_deref(), Some(&Value::U16(0x0102)));
    }

    #[test]
    fn option_decode_present_without_target_fails() {
        let mut target = None;
        let mut src: &[u8] = &[0x01, 0x05];
        assert!(matches!(
            decode_option_nested(&codec(), &mut target, &mut src),
            Err(CodecError::MissingOptionTarget)
        ));
    }

    #[test]
    fn option_top_level_absent_is_empty() {
        let mut buf = BytesMut::new();
        encode_option_top_level(&codec(), None, &mut buf).unwrap();
        assert!(buf.is_empty());

        let mut target = Some(Box::new(Value::U8(3)));
        let mut src: &[u8] = &[];
        decode_option_top_level(&codec(), &mut target, &mut src).unwrap();
        assert!(target.is_none());
    }

    #[test]
    fn list_nested_bytes() {
        let mut buf = BytesMut::new();
        let items = [Value::U8(1), Value::U8(2), Value::U8(3)];
        encode_list_nested(&codec(), &items, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0, 0, 0, 3, 1, 2, 3]);
    }

    #[test]
    fn list_decode_uses_factory_per_item() {
        let mut list = OutputList::new(|| Value::U16(0));
        let mut src: &[u8] = &[0, 0, 0, 2, 0x00, 0x01, 0x00, 0x02];
        decode_list_nested(&codec(), &mut list, &mut src).unwrap();
        assert_eq!(list.items, vec![Value::U16(1), Value::U16(2)]);
        assert!(src.is_empty());
    }

    #[test]
    fn list_decode_replaces_previous_items() {
        let mut list = OutputList::new(|| Value::U8(0));
        list.items.push(Value::U8(42));
        let mut src: &[u8] = &[0, 0, 0, 1, 7];
        decode_list_nested(&codec(), &mut list, &mut src).unwrap();
        assert_eq!(list.items, vec![Value::U8(7)]);
    }

    #[test]
    fn list_decode_without_factory_fails_before_reading() {
        let mut list = OutputList::default();
        let mut src: &[u8] = &[0, 0, 0, 1, 7];
        assert!(matches!(
            decode_list_nested(&codec(), &mut list, &mut src),
            Err(CodecError::MissingItemFactory)
        ));
        assert_eq!(src.len(), 5);
    }

    #[test]
    fn list_decode_huge_count_fails_without_allocating() {
        let mut list = OutputList::new(|| Value::U8(0));
        let mut src: &[u8] = &[0x00, 0xff, 0xff, 0xff, 1];
        assert!(matches!(
            decode_list_nested(&Codec::new(), &mut list, &mut src),
            Err(CodecError::ShortRead { .. })
        ));
    }

    #[test]
    fn list_top_level_reads_until_end() {
        let mut buf = BytesMut::new();
        let items = [Value::U32(1), Value::U32(2)];
        encode_list_top_level(&codec(), &items, &mut buf).unwrap();
        assert_eq!(buf.len(), 8);

        let mut list = OutputList::new(|| Value::U32(0));
        let mut src = buf.freeze();
        decode_list_top_level(&codec(), &mut list, &mut src).unwrap();
        assert_eq!(list.items, items.to_vec());
    }

    #[test]
    fn struct_fields_encode_in_order() {
        let fields = vec![Field::new("a", Value::U8(1)), Field::new("b", Value::U8(2))];
        let mut buf = BytesMut::new();
        encode_fields(&codec(), &fields, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x01, 0x02]);
    }

    #[test]
    fn struct_field_errors_are_named() {
        let fields = vec![
            Field::new("ok", Value::U8(1)),
            Field::new("owner", Value::Address(vec![0; 5])),
        ];
        let mut buf = BytesMut::new();
        let err = encode_fields(&codec(), &fields, &mut buf).unwrap_err();
        assert_eq!(err.field_path(), vec!["owner"]);
        assert!(matches!(err.root_cause(), CodecError::InvalidLength { .. }));
    }

    #[test]
    fn nested_struct_decode_error_has_full_path() {
        let mut fields = vec![Field::new(
            "inner",
            Value::Struct(StructValue::new(vec![Field::new("flag", Value::Bool(false))])),
        )];
        let mut src: &[u8] = &[0x05];
        let err = decode_fields(&codec(), &mut fields, &mut src).unwrap_err();
        assert_eq!(err.field_path(), vec!["inner", "flag"]);
        assert!(matches!(err.root_cause(), CodecError::InvalidBool(5)));
    }

    #[test]
    fn enum_nested_writes_discriminant_then_fields() {
        let value = EnumValue::new(3, vec![Field::new("x", Value::U16(0x0a0b))]);
        let mut buf = BytesMut::new();
        encode_enum_nested(&codec(), &value, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x03, 0x0a, 0x0b]);
    }

    #[test]
    fn enum_top_level_default_is_empty() {
        let mut buf = BytesMut::new();
        encode_enum_top_level(&codec(), &EnumValue::unit(0), &mut buf).unwrap();
        assert!(buf.is_empty());

        encode_enum_top_level(&codec(), &EnumValue::unit(1), &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x01]);

        let mut target = EnumValue::new(4, vec![Field::new("x", Value::U8(1))]);
        let mut src: &[u8] = &[];
        decode_enum_top_level(&codec(), &mut target, &mut src).unwrap();
        assert_eq!(target, EnumValue::unit(0));
    }

    #[test]
    fn enum_zero_with_fields_is_not_omitted() {
        let value = EnumValue::new(0, vec![Field::new("x", Value::U8(9))]);
        let mut buf = BytesMut::new();
        encode_enum_top_level(&codec(), &value, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x00, 0x09]);
    }

    #[test]
    fn enum_decode_uses_caller_shape() {
        let mut target = EnumValue::new(0, vec![Field::new("amount", Value::U32(0))]);
        let mut src: &[u8] = &[0x02, 0, 0, 0, 0x10];
        decode_enum_nested(&codec(), &mut target, &mut src).unwrap();
        assert_eq!(target.discriminant, 2);
        assert_eq!(target.fields[0].value, Value::U32(16));
    }
}
