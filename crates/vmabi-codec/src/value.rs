//! In-memory representation of ABI values.
//!
//! A [`Value`] is both what callers encode and the target a decoder fills
//! in. Decode targets must already have the right shape: struct and enum
//! field lists are pre-populated, present options hold a target for their
//! inner value, and output lists carry an [`ItemFactory`].

use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, BigUint};

/// Size of an address (a public key), in bytes.
pub const ADDRESS_LEN: usize = 32;

/// Produces a fresh, correctly shaped decode target for one list element.
pub type ItemFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// An ABI value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    /// Unsigned arbitrary-precision integer.
    BigUint(BigUint),
    /// Signed arbitrary-precision integer, two's complement on the wire.
    BigInt(BigInt),
    /// UTF-8 text.
    String(String),
    /// Raw byte buffer.
    Bytes(Vec<u8>),
    /// Public key; must be exactly [`ADDRESS_LEN`] bytes.
    Address(Vec<u8>),
    /// Optional value. When decoding, `Some` holds the target for the inner
    /// value; an absent discriminant resets it to `None`.
    Option(Option<Box<Value>>),
    /// Sequence of values to encode.
    InputList(Vec<Value>),
    /// Sequence of decoded values.
    OutputList(OutputList),
    Struct(StructValue),
    Enum(EnumValue),
}

impl Value {
    /// Static name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::BigUint(_) => "BigUint",
            Value::BigInt(_) => "BigInt",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Address(_) => "Address",
            Value::Option(_) => "Option",
            Value::InputList(_) => "List",
            Value::OutputList(_) => "List",
            Value::Struct(_) => "struct",
            Value::Enum(_) => "enum",
        }
    }

    /// A present option holding `inner`.
    pub fn some(inner: Value) -> Self {
        Value::Option(Some(Box::new(inner)))
    }

    /// An absent option.
    pub fn none() -> Self {
        Value::Option(None)
    }
}

/// A named struct or enum field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name, used only in error messages.
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Ordered list of fields. Order is significant; names are not matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructValue {
    pub fields: Vec<Field>,
}

impl StructValue {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

/// Enum value: a discriminant plus the fields of that variant.
///
/// The codec never derives the field list from the discriminant. Before
/// decoding, callers must set `fields` to the shape of the variant they
/// expect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumValue {
    pub discriminant: u8,
    pub fields: Vec<Field>,
}

impl EnumValue {
    pub fn new(discriminant: u8, fields: Vec<Field>) -> Self {
        Self {
            discriminant,
            fields,
        }
    }

    /// Variant without fields.
    pub fn unit(discriminant: u8) -> Self {
        Self::new(discriminant, Vec::new())
    }
}

/// Decoded list plus the factory used to create each element target.
#[derive(Clone, Default)]
pub struct OutputList {
    pub items: Vec<Value>,
    pub item_factory: Option<ItemFactory>,
}

impl OutputList {
    /// Empty output list using `factory` for element targets.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            items: Vec::new(),
            item_factory: Some(Arc::new(factory)),
        }
    }
}

impl fmt::Debug for OutputList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputList")
            .field("items", &self.items)
            .field("item_factory", &self.item_factory.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// Factories are not comparable; two lists are equal when their items are.
impl PartialEq for OutputList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}
