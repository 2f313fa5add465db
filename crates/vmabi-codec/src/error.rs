/// Errors that can occur while encoding or decoding ABI values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input ended before the required number of bytes.
    #[error("short read ({needed} bytes needed, {available} available)")]
    ShortRead { needed: usize, available: usize },

    /// The underlying stream reached EOF before a value started.
    #[error("stream closed")]
    StreamClosed,

    /// An I/O error occurred on the underlying stream.
    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An output list was decoded without an item factory.
    #[error("missing item factory for list decode")]
    MissingItemFactory,

    /// A present option was decoded without a target for its inner value.
    #[error("missing target for present option value")]
    MissingOptionTarget,

    /// A fixed-length field had the wrong size.
    #[error("invalid {kind} length ({actual} bytes, expected {expected})")]
    InvalidLength {
        kind: &'static str,
        actual: usize,
        expected: usize,
    },

    /// A length does not fit the 4-byte length prefix.
    #[error("length {0} does not fit a 4-byte prefix")]
    LengthOverflow(usize),

    /// A decoded length prefix is above the configured maximum.
    #[error("length prefix too large ({len}, max {max})")]
    LengthExceeded { len: usize, max: usize },

    /// A complete-payload decode left input unread.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// A boolean byte other than 0 or 1.
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    /// A top-level boolean payload longer than one byte.
    #[error("invalid top-level bool length ({0} bytes)")]
    InvalidBoolLength(usize),

    /// A decoded integer does not fit the target type.
    #[error("value out of range for {ty}")]
    Overflow { ty: &'static str },

    /// A negative fixed-width integer in the top-level context, which
    /// carries only a magnitude.
    #[error("negative {ty} has no top-level encoding")]
    NegativeTopLevel { ty: &'static str },

    /// A decoded string is not valid UTF-8.
    #[error("invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A struct or enum field failed to encode or decode.
    #[error("field `{name}`: {source}")]
    Field {
        name: String,
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wrap this error with the name of the field it came from.
    pub fn in_field(self, name: impl Into<String>) -> Self {
        CodecError::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all field wrapping removed.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Field names from outermost to innermost.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let CodecError::Field { name, source } = current {
            path.push(name.as_str());
            current = &**source;
        }
        path
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
