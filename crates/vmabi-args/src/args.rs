use std::fmt;
use std::sync::Arc;

use vmabi_codec::Value;

/// Produces a fresh target for one variadic item.
pub type ArgFactory = Arc<dyn Fn() -> ArgValue + Send + Sync>;

/// One call argument, in terms of the parts it occupies.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Exactly one part holding the top-level encoding of the value.
    Single(Value),
    /// Several arguments laid out back to back.
    Multi(Vec<ArgValue>),
    /// Zero parts when absent. Must be the last argument.
    Optional(Option<Box<ArgValue>>),
    /// Takes every remaining part. Must be the last argument.
    Variadic(VariadicValues),
}

impl ArgValue {
    /// Static name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Single(_) => "single",
            ArgValue::Multi(_) => "multi",
            ArgValue::Optional(_) => "optional",
            ArgValue::Variadic(_) => "variadic",
        }
    }

    /// Whether this argument can take a variable number of parts.
    pub fn is_open_ended(&self) -> bool {
        match self {
            ArgValue::Single(_) => false,
            ArgValue::Multi(items) => items.iter().any(ArgValue::is_open_ended),
            ArgValue::Optional(_) | ArgValue::Variadic(_) => true,
        }
    }

    /// A present optional argument.
    pub fn some(inner: ArgValue) -> Self {
        ArgValue::Optional(Some(Box::new(inner)))
    }

    /// An absent optional argument.
    pub fn none() -> Self {
        ArgValue::Optional(None)
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        ArgValue::Single(value)
    }
}

/// Variadic tail: items to serialize, or the items a deserialization
/// produced through the factory.
#[derive(Clone, Default)]
pub struct VariadicValues {
    pub items: Vec<ArgValue>,
    pub item_factory: Option<ArgFactory>,
}

impl VariadicValues {
    /// Variadic tail holding `items`, for serialization.
    pub fn from_items(items: Vec<ArgValue>) -> Self {
        Self {
            items,
            item_factory: None,
        }
    }

    /// Empty variadic target using `factory` for each item.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> ArgValue + Send + Sync + 'static,
    {
        Self {
            items: Vec::new(),
            item_factory: Some(Arc::new(factory)),
        }
    }
}

impl fmt::Debug for VariadicValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariadicValues")
            .field("items", &self.items)
            .field("item_factory", &self.item_factory.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl PartialEq for VariadicValues {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}
