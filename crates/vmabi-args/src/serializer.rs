use bytes::Bytes;
use tracing::debug;
use vmabi_codec::Codec;

use crate::args::ArgValue;
use crate::config::SerializerConfig;
use crate::error::{ArgsError, Result};

/// Converts argument lists to and from parts.
///
/// Every single value is top-level encoded into its own part. Optional and
/// variadic arguments are only allowed in last position, where the number
/// of remaining parts decides how much they take.
#[derive(Debug, Clone, Default)]
pub struct ArgsSerializer {
    codec: Codec,
    config: SerializerConfig,
}

impl ArgsSerializer {
    /// Create a serializer with default configuration.
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    /// Create a serializer with explicit configuration.
    pub fn with_config(config: SerializerConfig) -> Self {
        Self {
            codec: Codec::with_config(config.codec),
            config,
        }
    }

    /// Current serializer configuration.
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Serialize `values` to separator-joined lowercase hex.
    pub fn serialize(&self, values: &[ArgValue]) -> Result<String> {
        let parts = self.serialize_to_parts(values)?;
        Ok(self.join_parts(&parts))
    }

    /// Serialize `values` to raw parts.
    pub fn serialize_to_parts(&self, values: &[ArgValue]) -> Result<Vec<Bytes>> {
        check_last_position(values)?;

        let mut parts = Vec::new();
        for (index, value) in values.iter().enumerate() {
            self.serialize_value(value, &mut parts)
                .map_err(|err| err.at_argument(index))?;
        }
        Ok(parts)
    }

    /// Deserialize separator-joined hex into the pre-shaped `outputs`.
    ///
    /// An empty string is a single empty part.
    pub fn deserialize(&self, data: &str, outputs: &mut [ArgValue]) -> Result<()> {
        let parts = self.split_parts(data)?;
        self.deserialize_parts(&parts, outputs)
    }

    /// Deserialize raw parts into the pre-shaped `outputs`.
    pub fn deserialize_parts(&self, parts: &[Bytes], outputs: &mut [ArgValue]) -> Result<()> {
        check_last_position(outputs)?;
        debug!(
            parts = parts.len(),
            outputs = outputs.len(),
            "deserializing arguments"
        );

        let mut cursor = PartsCursor { parts, pos: 0 };
        for (index, output) in outputs.iter_mut().enumerate() {
            self.deserialize_value(&mut cursor, output)
                .map_err(|err| err.at_argument(index))?;
        }

        let unused = cursor.remaining();
        if unused > 0 {
            return Err(ArgsError::TooManyParts(unused));
        }
        Ok(())
    }

    /// Join raw parts as lowercase hex.
    pub fn join_parts(&self, parts: &[Bytes]) -> String {
        parts
            .iter()
            .map(hex::encode)
            .collect::<Vec<_>>()
            .join(self.config.parts_separator.as_str())
    }

    /// Split separator-joined hex into raw parts.
    pub fn split_parts(&self, data: &str) -> Result<Vec<Bytes>> {
        data.split(self.config.parts_separator.as_str())
            .enumerate()
            .map(|(index, part)| {
                hex::decode(part)
                    .map(Bytes::from)
                    .map_err(|source| ArgsError::InvalidHex { index, source })
            })
            .collect()
    }

    fn serialize_value(&self, value: &ArgValue, parts: &mut Vec<Bytes>) -> Result<()> {
        match value {
            ArgValue::Single(v) => parts.push(self.codec.encode_top_level(v)?),
            ArgValue::Multi(items) => {
                check_last_position(items)?;
                for item in items {
                    self.serialize_value(item, parts)?;
                }
            }
            ArgValue::Optional(None) => {}
            ArgValue::Optional(Some(inner)) => self.serialize_value(inner, parts)?,
            ArgValue::Variadic(variadic) => {
                for item in &variadic.items {
                    if item.is_open_ended() {
                        return Err(ArgsError::NotLast { kind: item.kind() });
                    }
                    self.serialize_value(item, parts)?;
                }
            }
        }
        Ok(())
    }

    fn deserialize_value(&self, cursor: &mut PartsCursor<'_>, target: &mut ArgValue) -> Result<()> {
        match target {
            ArgValue::Single(v) => {
                let (index, part) = cursor.next().ok_or(ArgsError::NotEnoughParts(cursor.pos))?;
                self.codec.decode_top_level(v, part).map_err(|err| {
                    debug!(part = index, error = %err, "part decode failed");
                    ArgsError::Codec(err)
                })?;
            }
            ArgValue::Multi(items) => {
                check_last_position(items)?;
                for item in items.iter_mut() {
                    self.deserialize_value(cursor, item)?;
                }
            }
            ArgValue::Optional(inner) => {
                if cursor.remaining() == 0 {
                    *inner = None;
                    return Ok(());
                }
                let inner = inner
                    .as_deref_mut()
                    .ok_or(ArgsError::MissingOptionalTarget)?;
                self.deserialize_value(cursor, inner)?;
            }
            ArgValue::Variadic(variadic) => {
                let Some(factory) = variadic.item_factory.clone() else {
                    return Err(ArgsError::MissingItemFactory);
                };
                variadic.items.clear();
                while cursor.remaining() > 0 {
                    let mut item = factory();
                    if item.is_open_ended() {
                        return Err(ArgsError::NotLast { kind: item.kind() });
                    }
                    let start = cursor.pos;
                    self.deserialize_value(cursor, &mut item)?;
                    if cursor.pos == start {
                        return Err(ArgsError::EmptyVariadicItem(start));
                    }
                    variadic.items.push(item);
                }
            }
        }
        Ok(())
    }
}

struct PartsCursor<'a> {
    parts: &'a [Bytes],
    pos: usize,
}

impl<'a> PartsCursor<'a> {
    fn next(&mut self) -> Option<(usize, &'a [u8])> {
        let part = self.parts.get(self.pos)?;
        let index = self.pos;
        self.pos += 1;
        Some((index, part.as_ref()))
    }

    fn remaining(&self) -> usize {
        self.parts.len() - self.pos
    }
}

/// Open-ended arguments may only appear last in a sequence.
fn check_last_position(values: &[ArgValue]) -> Result<()> {
    let Some((_, init)) = values.split_last() else {
        return Ok(());
    };
    match init.iter().find(|value| value.is_open_ended()) {
        Some(value) => Err(ArgsError::NotLast { kind: value.kind() }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use vmabi_codec::{CodecError, EnumValue, Field, OutputList, StructValue, Value};

    use super::*;
    use crate::args::VariadicValues;

    fn single(value: Value) -> ArgValue {
        ArgValue::Single(value)
    }

    #[test]
    fn serialize_singles() {
        let serializer = ArgsSerializer::new();
        let data = serializer
            .serialize(&[
                single(Value::U32(1)),
                single(Value::Bool(false)),
                single(Value::String("ab".into())),
            ])
            .unwrap();
        assert_eq!(data, "01@@6162");
    }

    #[test]
    fn deserialize_singles() {
        let serializer = ArgsSerializer::new();
        let mut outputs = [
            single(Value::U32(0)),
            single(Value::Bool(true)),
            single(Value::String(String::new())),
        ];
        serializer.deserialize("01@@6162", &mut outputs).unwrap();
        assert_eq!(
            outputs,
            [
                single(Value::U32(1)),
                single(Value::Bool(false)),
                single(Value::String("ab".into())),
            ]
        );
    }

    #[test]
    fn variadic_item_without_parts_fails() {
        let serializer = ArgsSerializer::new();
        let mut outputs = [ArgValue::Variadic(VariadicValues::new(|| {
            ArgValue::Multi(Vec::new())
        }))];
        let err = serializer.deserialize("01", &mut outputs).unwrap_err();
        match err {
            ArgsError::Argument { index, source } => {
                assert_eq!(index, 0);
                assert!(matches!(*source, ArgsError::EmptyVariadicItem(0)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_data_is_one_empty_part() {
        let serializer = ArgsSerializer::new();
        assert_eq!(serializer.split_parts("").unwrap(), vec![Bytes::new()]);

        let mut outputs = [single(Value::U64(5))];
        serializer.deserialize("", &mut outputs).unwrap();
        assert_eq!(outputs[0], single(Value::U64(0)));
    }

    #[test]
    fn custom_separator() {
        let serializer = ArgsSerializer::with_config(SerializerConfig {
            parts_separator: "|".to_string(),
            ..SerializerConfig::default()
        });
        let data = serializer
            .serialize(&[single(Value::U8(10)), single(Value::U8(11))])
            .unwrap();
        assert_eq!(data, "0a|0b");
    }

    #[test]
    fn struct_argument_is_one_part() {
        let serializer = ArgsSerializer::new();
        let value = Value::Struct(StructValue::new(vec![
            Field::new("a", Value::U8(1)),
            Field::new("b", Value::U16(2)),
        ]));
        assert_eq!(serializer.serialize(&[single(value)]).unwrap(), "010002");
    }

    #[test]
    fn multi_spans_parts() {
        let serializer = ArgsSerializer::new();
        let multi = ArgValue::Multi(vec![single(Value::U8(1)), single(Value::U8(2))]);
        let data = serializer
            .serialize(&[multi, single(Value::U8(3))])
            .unwrap();
        assert_eq!(data, "01@02@03");

        let mut outputs = [
            ArgValue::Multi(vec![single(Value::U8(0)), single(Value::U8(0))]),
            single(Value::U8(0)),
        ];
        serializer.deserialize(&data, &mut outputs).unwrap();
        assert_eq!(
            outputs[0],
            ArgValue::Multi(vec![single(Value::U8(1)), single(Value::U8(2))])
        );
        assert_eq!(outputs[1], single(Value::U8(3)));
    }

    #[test]
    fn optional_absent_and_present() {
        let serializer = ArgsSerializer::new();
        assert_eq!(
            serializer
                .serialize(&[single(Value::U8(1)), ArgValue::none()])
                .unwrap(),
            "01"
        );
        assert_eq!(
            serializer
                .serialize(&[single(Value::U8(1)), ArgValue::some(single(Value::U8(2)))])
                .unwrap(),
            "01@02"
        );

        let mut outputs = [single(Value::U8(0)), ArgValue::some(single(Value::U8(0)))];
        serializer.deserialize("07", &mut outputs).unwrap();
        assert_eq!(outputs[1], ArgValue::none());

        let mut outputs = [single(Value::U8(0)), ArgValue::some(single(Value::U8(0)))];
        serializer.deserialize("07@08", &mut outputs).unwrap();
        assert_eq!(outputs[1], ArgValue::some(single(Value::U8(8))));
    }

    #[test]
    fn variadic_takes_remaining_parts() {
        let serializer = ArgsSerializer::new();
        let data = serializer
            .serialize(&[
                single(Value::String("tok".into())),
                ArgValue::Variadic(VariadicValues::from_items(vec![
                    single(Value::U32(1)),
                    single(Value::U32(2)),
                    single(Value::U32(3)),
                ])),
            ])
            .unwrap();
        assert_eq!(data, "746f6b@01@02@03");

        let mut outputs = [
            single(Value::String(String::new())),
            ArgValue::Variadic(VariadicValues::new(|| ArgValue::Single(Value::U32(0)))),
        ];
        serializer.deserialize(&data, &mut outputs).unwrap();
        let ArgValue::Variadic(tail) = &outputs[1] else {
            panic!("expected variadic output");
        };
        assert_eq!(
            tail.items,
            vec![
                single(Value::U32(1)),
                single(Value::U32(2)),
                single(Value::U32(3))
            ]
        );
    }

    #[test]
    fn variadic_of_multi_pairs() {
        let serializer = ArgsSerializer::new();
        let pair = |k: &str, v: u64| {
            ArgValue::Multi(vec![
                single(Value::Bytes(k.as_bytes().to_vec())),
                single(Value::U64(v)),
            ])
        };
        let data = serializer
            .serialize(&[ArgValue::Variadic(VariadicValues::from_items(vec![
                pair("a", 1),
                pair("b", 2),
            ]))])
            .unwrap();
        assert_eq!(data, "61@01@62@02");

        let mut outputs = [ArgValue::Variadic(VariadicValues::new(|| {
            ArgValue::Multi(vec![single(Value::Bytes(Vec::new())), single(Value::U64(0))])
        }))];
        serializer.deserialize(&data, &mut outputs).unwrap();
        assert_eq!(
            outputs[0],
            ArgValue::Variadic(VariadicValues::from_items(vec![pair("a", 1), pair("b", 2)]))
        );
    }

    #[test]
    fn variadic_without_factory_fails() {
        let serializer = ArgsSerializer::new();
        let mut outputs = [ArgValue::Variadic(VariadicValues::default())];
        let err = serializer.deserialize("01", &mut outputs).unwrap_err();
        assert!(matches!(
            err,
            ArgsError::Argument { index: 0, ref source } if matches!(**source, ArgsError::MissingItemFactory)
        ));
    }

    #[test]
    fn open_ended_must_be_last() {
        let serializer = ArgsSerializer::new();
        let err = serializer
            .serialize(&[ArgValue::none(), single(Value::U8(1))])
            .unwrap_err();
        assert!(matches!(err, ArgsError::NotLast { kind: "optional" }));

        let mut outputs = [
            ArgValue::Variadic(VariadicValues::new(|| single(Value::U8(0)))),
            single(Value::U8(0)),
        ];
        let err = serializer.deserialize("01@02", &mut outputs).unwrap_err();
        assert!(matches!(err, ArgsError::NotLast { kind: "variadic" }));
    }

    #[test]
    fn part_count_mismatch() {
        let serializer = ArgsSerializer::new();

        let mut outputs = [single(Value::U8(0)), single(Value::U8(0))];
        let err = serializer.deserialize("01", &mut outputs).unwrap_err();
        assert!(matches!(
            err,
            ArgsError::Argument { index: 1, ref source } if matches!(**source, ArgsError::NotEnoughParts(1))
        ));

        let mut outputs = [single(Value::U8(0))];
        let err = serializer.deserialize("01@02@03", &mut outputs).unwrap_err();
        assert!(matches!(err, ArgsError::TooManyParts(2)));
    }

    #[test]
    fn invalid_hex_reports_part_index() {
        let serializer = ArgsSerializer::new();
        let mut outputs = [single(Value::U8(0)), single(Value::U8(0))];
        let err = serializer.deserialize("01@zz", &mut outputs).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidHex { index: 1, .. }));
    }

    #[test]
    fn codec_errors_are_wrapped_with_argument_index() {
        let serializer = ArgsSerializer::new();
        let mut outputs = [single(Value::U8(0)), single(Value::U8(0))];
        let err = serializer.deserialize("01@0100", &mut outputs).unwrap_err();
        let ArgsError::Argument { index, source } = err else {
            panic!("expected argument error");
        };
        assert_eq!(index, 1);
        assert!(matches!(
            *source,
            ArgsError::Codec(CodecError::Overflow { ty: "u8" })
        ));
    }

    #[test]
    fn list_and_enum_parts_roundtrip() {
        let serializer = ArgsSerializer::new();
        let list = Value::InputList(vec![Value::U16(5), Value::U16(6)]);
        let choice = Value::Enum(EnumValue::unit(0));
        let data = serializer
            .serialize(&[single(list), single(choice)])
            .unwrap();
        assert_eq!(data, "00050006@");

        let mut outputs = [
            single(Value::OutputList(OutputList::new(|| Value::U16(0)))),
            single(Value::Enum(EnumValue::unit(9))),
        ];
        serializer.deserialize(&data, &mut outputs).unwrap();
        let ArgValue::Single(Value::OutputList(list)) = &outputs[0] else {
            panic!("expected list output");
        };
        assert_eq!(list.items, vec![Value::U16(5), Value::U16(6)]);
        assert_eq!(outputs[1], single(Value::Enum(EnumValue::unit(0))));
    }
}
