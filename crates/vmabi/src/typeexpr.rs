//! Type expressions for the command line.
//!
//! ```text
//! u32
//! List<Option<BigUint>>
//! struct { owner: Address, amounts: List<u64> }
//! enum { id: u8, label: string }
//! ```
//!
//! An `enum { ... }` lists the fields of the variant the caller expects.
//! The discriminant comes from the data; the field shape does not.

use std::fmt;
use std::str::FromStr;

use vmabi::codec::bigint::{BigInt, BigUint};
use vmabi::codec::{EnumValue, Field, OutputList, StructValue, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    BigUint,
    BigInt,
    String,
    Bytes,
    Address,
    Option(Box<TypeExpr>),
    List(Box<TypeExpr>),
    Struct(Vec<(String, TypeExpr)>),
    Enum(Vec<(String, TypeExpr)>),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid type at offset {offset}: {message}")]
pub struct TypeParseError {
    pub offset: usize,
    pub message: String,
}

impl TypeExpr {
    /// An empty decode target with this shape.
    pub fn target(&self) -> Value {
        match self {
            TypeExpr::Bool => Value::Bool(false),
            TypeExpr::U8 => Value::U8(0),
            TypeExpr::U16 => Value::U16(0),
            TypeExpr::U32 => Value::U32(0),
            TypeExpr::U64 => Value::U64(0),
            TypeExpr::I8 => Value::I8(0),
            TypeExpr::I16 => Value::I16(0),
            TypeExpr::I32 => Value::I32(0),
            TypeExpr::I64 => Value::I64(0),
            TypeExpr::BigUint => Value::BigUint(BigUint::default()),
            TypeExpr::BigInt => Value::BigInt(BigInt::default()),
            TypeExpr::String => Value::String(String::new()),
            TypeExpr::Bytes => Value::Bytes(Vec::new()),
            TypeExpr::Address => Value::Address(Vec::new()),
            TypeExpr::Option(inner) => Value::some(inner.target()),
            TypeExpr::List(inner) => {
                let item = (**inner).clone();
                Value::OutputList(OutputList::new(move || item.target()))
            }
            TypeExpr::Struct(fields) => Value::Struct(StructValue::new(target_fields(fields))),
            TypeExpr::Enum(fields) => Value::Enum(EnumValue::new(0, target_fields(fields))),
        }
    }
}

fn target_fields(fields: &[(String, TypeExpr)]) -> Vec<Field> {
    fields
        .iter()
        .map(|(name, ty)| Field::new(name.clone(), ty.target()))
        .collect()
}

impl FromStr for TypeExpr {
    type Err = TypeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Bool => f.write_str("bool"),
            TypeExpr::U8 => f.write_str("u8"),
            TypeExpr::U16 => f.write_str("u16"),
            TypeExpr::U32 => f.write_str("u32"),
            TypeExpr::U64 => f.write_str("u64"),
            TypeExpr::I8 => f.write_str("i8"),
            TypeExpr::I16 => f.write_str("i16"),
            TypeExpr::I32 => f.write_str("i32"),
            TypeExpr::I64 => f.write_str("i64"),
            TypeExpr::BigUint => f.write_str("BigUint"),
            TypeExpr::BigInt => f.write_str("BigInt"),
            TypeExpr::String => f.write_str("string"),
            TypeExpr::Bytes => f.write_str("bytes"),
            TypeExpr::Address => f.write_str("Address"),
            TypeExpr::Option(inner) => write!(f, "Option<{inner}>"),
            TypeExpr::List(inner) => write!(f, "List<{inner}>"),
            TypeExpr::Struct(fields) => write_fields(f, "struct", fields),
            TypeExpr::Enum(fields) => write_fields(f, "enum", fields),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, keyword: &str, fields: &[(String, TypeExpr)]) -> fmt::Result {
    if fields.is_empty() {
        return write!(f, "{keyword} {{}}");
    }
    write!(f, "{keyword} {{ ")?;
    for (i, (name, ty)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}: {ty}")?;
    }
    f.write_str(" }")
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<TypeExpr, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        let name = self.ident()?;
        let ty = match name.to_ascii_lowercase().as_str() {
            "bool" => TypeExpr::Bool,
            "u8" => TypeExpr::U8,
            "u16" => TypeExpr::U16,
            "u32" => TypeExpr::U32,
            "u64" => TypeExpr::U64,
            "i8" => TypeExpr::I8,
            "i16" => TypeExpr::I16,
            "i32" => TypeExpr::I32,
            "i64" => TypeExpr::I64,
            "biguint" => TypeExpr::BigUint,
            "bigint" => TypeExpr::BigInt,
            "string" => TypeExpr::String,
            "bytes" => TypeExpr::Bytes,
            "address" => TypeExpr::Address,
            "option" => {
                let arg_start = self.pos;
                let inner = self.parse_generic_arg()?;
                // JSON `null` cannot tell `None` from `Some(None)`.
                if let TypeExpr::Option(_) = inner {
                    return Err(TypeParseError {
                        offset: arg_start,
                        message: "directly nested Option is not supported".to_string(),
                    });
                }
                TypeExpr::Option(Box::new(inner))
            }
            "list" => TypeExpr::List(Box::new(self.parse_generic_arg()?)),
            "struct" => TypeExpr::Struct(self.parse_fields()?),
            "enum" => TypeExpr::Enum(self.parse_fields()?),
            _ => {
                return Err(TypeParseError {
                    offset: start,
                    message: format!("unknown type `{name}`"),
                })
            }
        };
        Ok(ty)
    }

    fn parse_generic_arg(&mut self) -> Result<TypeExpr, TypeParseError> {
        self.expect('<')?;
        let inner = self.parse_type()?;
        self.expect('>')?;
        Ok(inner)
    }

    fn parse_fields(&mut self) -> Result<Vec<(String, TypeExpr)>, TypeParseError> {
        self.expect('{')?;
        let mut fields: Vec<(String, TypeExpr)> = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(fields);
            }
            let start = self.pos;
            let name = self.ident()?.to_string();
            if fields.iter().any(|(existing, _)| *existing == name) {
                return Err(TypeParseError {
                    offset: start,
                    message: format!("duplicate field `{name}`"),
                });
            }
            self.expect(':')?;
            let ty = self.parse_type()?;
            fields.push((name, ty));

            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.expect('}')?;
            return Ok(fields);
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_ws();
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            return true;
        }
        false
    }

    fn expect(&mut self, c: char) -> Result<(), TypeParseError> {
        if self.eat(c) {
            return Ok(());
        }
        Err(self.error(&format!("expected `{c}`")))
    }

    fn error(&self, message: &str) -> TypeParseError {
        TypeParseError {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}
