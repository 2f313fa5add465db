use vmabi_codec::CodecError;

/// Errors that can occur while serializing or deserializing arguments.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    /// A part failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A part is not valid hex.
    #[error("invalid hex in part {index}: {source}")]
    InvalidHex {
        index: usize,
        source: hex::FromHexError,
    },

    /// The data ended before every argument was filled.
    #[error("not enough parts (part {0} missing)")]
    NotEnoughParts(usize),

    /// Parts were left over after every argument was filled.
    #[error("too many parts ({0} unused)")]
    TooManyParts(usize),

    /// An optional or variadic argument was followed by another argument.
    #[error("{kind} argument must be last")]
    NotLast { kind: &'static str },

    /// A variadic item consumed no parts, so the item loop cannot advance.
    #[error("variadic item at part {0} consumed no parts")]
    EmptyVariadicItem(usize),

    /// A variadic argument was deserialized without an item factory.
    #[error("missing item factory for variadic argument")]
    MissingItemFactory,

    /// A present optional argument was deserialized without a target.
    #[error("missing target for present optional argument")]
    MissingOptionalTarget,

    /// A top-level argument failed.
    #[error("argument {index}: {source}")]
    Argument {
        index: usize,
        source: Box<ArgsError>,
    },
}

impl ArgsError {
    /// Wrap this error with the index of the argument it came from.
    pub fn at_argument(self, index: usize) -> Self {
        ArgsError::Argument {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArgsError>;
