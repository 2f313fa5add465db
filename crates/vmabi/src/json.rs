//! JSON rendering of values for the command line.
//!
//! Big integers are decimal strings, byte strings and addresses are hex,
//! absent options are `null`, and enums are
//! `{"discriminant": n, "fields": {...}}`.

use serde_json::{json, Map};
use vmabi::codec::bigint::{BigInt, BigUint};
use vmabi::codec::{EnumValue, Field, StructValue, Value};

use crate::typeexpr::TypeExpr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid value at `{path}`: expected {expected}")]
pub struct JsonValueError {
    pub path: String,
    pub expected: String,
}

/// Build a value of type `ty` from its JSON form.
pub fn value_from_json(ty: &TypeExpr, json: &serde_json::Value) -> Result<Value, JsonValueError> {
    from_json_at(ty, json, "$")
}

fn from_json_at(ty: &TypeExpr, json: &serde_json::Value, path: &str) -> Result<Value, JsonValueError> {
    let mismatch = |expected: &str| JsonValueError {
        path: path.to_string(),
        expected: expected.to_string(),
    };

    let value = match ty {
        TypeExpr::Bool => Value::Bool(json.as_bool().ok_or_else(|| mismatch("bool"))?),
        TypeExpr::U8 => Value::U8(unsigned(json).ok_or_else(|| mismatch("u8"))?),
        TypeExpr::U16 => Value::U16(unsigned(json).ok_or_else(|| mismatch("u16"))?),
        TypeExpr::U32 => Value::U32(unsigned(json).ok_or_else(|| mismatch("u32"))?),
        TypeExpr::U64 => Value::U64(unsigned(json).ok_or_else(|| mismatch("u64"))?),
        TypeExpr::I8 => Value::I8(signed(json).ok_or_else(|| mismatch("i8"))?),
        TypeExpr::I16 => Value::I16(signed(json).ok_or_else(|| mismatch("i16"))?),
        TypeExpr::I32 => Value::I32(signed(json).ok_or_else(|| mismatch("i32"))?),
        TypeExpr::I64 => Value::I64(signed(json).ok_or_else(|| mismatch("i64"))?),
        TypeExpr::BigUint => Value::BigUint(
            decimal(json)
                .and_then(|text| text.parse::<BigUint>().ok())
                .ok_or_else(|| mismatch("unsigned decimal integer"))?,
        ),
        TypeExpr::BigInt => Value::BigInt(
            decimal(json)
                .and_then(|text| text.parse::<BigInt>().ok())
                .ok_or_else(|| mismatch("decimal integer"))?,
        ),
        TypeExpr::String => Value::String(json.as_str().ok_or_else(|| mismatch("string"))?.to_string()),
        TypeExpr::Bytes => Value::Bytes(hex_bytes(json).ok_or_else(|| mismatch("hex string"))?),
        TypeExpr::Address => Value::Address(hex_bytes(json).ok_or_else(|| mismatch("hex address"))?),
        TypeExpr::Option(inner) => {
            if json.is_null() {
                Value::none()
            } else {
                Value::some(from_json_at(inner, json, path)?)
            }
        }
        TypeExpr::List(inner) => {
            let items = json.as_array().ok_or_else(|| mismatch("array"))?;
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| from_json_at(inner, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Value::InputList(values)
        }
        TypeExpr::Struct(fields) => {
            let object = json.as_object().ok_or_else(|| mismatch("object"))?;
            Value::Struct(StructValue::new(fields_from_json(fields, object, path)?))
        }
        TypeExpr::Enum(fields) => {
            let object = json.as_object().ok_or_else(|| mismatch("enum object"))?;
            let discriminant = object
                .get("discriminant")
                .and_then(unsigned::<u8>)
                .ok_or_else(|| JsonValueError {
                    path: format!("{path}.discriminant"),
                    expected: "u8".to_string(),
                })?;
            let empty = Map::new();
            let field_values = match object.get("fields") {
                None => &empty,
                Some(value) => value.as_object().ok_or_else(|| JsonValueError {
                    path: format!("{path}.fields"),
                    expected: "object".to_string(),
                })?,
            };
            let fields = fields_from_json(fields, field_values, &format!("{path}.fields"))?;
            Value::Enum(EnumValue::new(discriminant, fields))
        }
    };
    Ok(value)
}

fn fields_from_json(
    fields: &[(String, TypeExpr)],
    object: &Map<String, serde_json::Value>,
    path: &str,
) -> Result<Vec<Field>, JsonValueError> {
    fields
        .iter()
        .map(|(name, ty)| {
            let field_path = format!("{path}.{name}");
            let json = object.get(name).ok_or_else(|| JsonValueError {
                path: field_path.clone(),
                expected: format!("field of type {ty}"),
            })?;
            Ok(Field::new(name.clone(), from_json_at(ty, json, &field_path)?))
        })
        .collect()
}

fn unsigned<T: TryFrom<u64>>(json: &serde_json::Value) -> Option<T> {
    json.as_u64().and_then(|n| T::try_from(n).ok())
}

fn signed<T: TryFrom<i64>>(json: &serde_json::Value) -> Option<T> {
    json.as_i64().and_then(|n| T::try_from(n).ok())
}

fn decimal(json: &serde_json::Value) -> Option<String> {
    match json {
        serde_json::Value::String(text) => Some(text.trim().to_string()),
        serde_json::Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

fn hex_bytes(json: &serde_json::Value) -> Option<Vec<u8>> {
    let text = json.as_str()?;
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).ok()
}

/// Render a value as JSON.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(v) => json!(v),
        Value::U8(v) => json!(v),
        Value::U16(v) => json!(v),
        Value::U32(v) => json!(v),
        Value::U64(v) => json!(v),
        Value::I8(v) => json!(v),
        Value::I16(v) => json!(v),
        Value::I32(v) => json!(v),
        Value::I64(v) => json!(v),
        Value::BigUint(v) => json!(v.to_string()),
        Value::BigInt(v) => json!(v.to_string()),
        Value::String(v) => json!(v),
        Value::Bytes(v) | Value::Address(v) => json!(hex::encode(v)),
        Value::Option(None) => serde_json::Value::Null,
        Value::Option(Some(inner)) => value_to_json(inner),
        Value::InputList(items) => items.iter().map(value_to_json).collect(),
        Value::OutputList(list) => list.items.iter().map(value_to_json).collect(),
        Value::Struct(s) => serde_json::Value::Object(fields_to_json(&s.fields)),
        Value::Enum(e) => json!({
            "discriminant": e.discriminant,
            "fields": fields_to_json(&e.fields),
        }),
    }
}

fn fields_to_json(fields: &[Field]) -> Map<String, serde_json::Value> {
    fields
        .iter()
        .map(|field| (field.name.clone(), value_to_json(&field.value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(input: &str) -> TypeExpr {
        input.parse().expect("type should parse")
    }

    #[test]
    fn primitives_from_json() {
        assert_eq!(value_from_json(&ty("u16"), &json!(515)).unwrap(), Value::U16(515));
        assert_eq!(value_from_json(&ty("i8"), &json!(-3)).unwrap(), Value::I8(-3));
        assert_eq!(
            value_from_json(&ty("BigUint"), &json!("340282366920938463463374607431768211456")).unwrap(),
            Value::BigUint("340282366920938463463374607431768211456".parse().unwrap())
        );
        assert_eq!(
            value_from_json(&ty("BigInt"), &json!(-7)).unwrap(),
            Value::BigInt(BigInt::from(-7))
        );
        assert_eq!(
            value_from_json(&ty("bytes"), &json!("0xcafe")).unwrap(),
            Value::Bytes(vec![0xca, 0xfe])
        );
    }

    #[test]
    fn out_of_range_reports_path() {
        let err = value_from_json(&ty("List<u8>"), &json!([1, 256])).unwrap_err();
        assert_eq!(err.path, "$[1]");
        assert_eq!(err.expected, "u8");
    }

    #[test]
    fn missing_struct_field_reports_path() {
        let err = value_from_json(&ty("struct { a: u8, b: bool }"), &json!({"a": 1})).unwrap_err();
        assert_eq!(err.path, "$.b");
    }

    #[test]
    fn enum_from_json() {
        let value = value_from_json(
            &ty("enum { code: u32 }"),
            &json!({"discriminant": 2, "fields": {"code": 9}}),
        )
        .unwrap();
        assert_eq!(
            value,
            Value::Enum(EnumValue::new(2, vec![Field::new("code", Value::U32(9))]))
        );

        let unit = value_from_json(&ty("enum {}"), &json!({"discriminant": 1})).unwrap();
        assert_eq!(unit, Value::Enum(EnumValue::unit(1)));
    }

    #[test]
    fn renders_composites() {
        let value = Value::Struct(StructValue::new(vec![
            Field::new("owner", Value::Address(vec![0xab; 2])),
            Field::new("amount", Value::BigUint(BigUint::from(10u8))),
            Field::new("memo", Value::none()),
            Field::new("tags", Value::InputList(vec![Value::String("x".into())])),
        ]));
        assert_eq!(
            value_to_json(&value),
            json!({"owner": "abab", "amount": "10", "memo": null, "tags": ["x"]})
        );
    }

    #[test]
    fn json_roundtrip_through_type() {
        let ty = ty("struct { id: u64, maybe: Option<i32>, kind: enum { n: u8 } }");
        let input = json!({
            "id": 18446744073709551615u64,
            "maybe": -1,
            "kind": {"discriminant": 3, "fields": {"n": 4}},
        });
        let value = value_from_json(&ty, &input).unwrap();
        assert_eq!(value_to_json(&value), input);
    }
}
