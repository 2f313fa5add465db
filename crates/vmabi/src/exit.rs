use std::fmt;
use std::io;

use vmabi::args::ArgsError;
use vmabi::codec::CodecError;

use crate::json::JsonValueError;
use crate::typeexpr::TypeParseError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Io(source) => io_error(context, source),
        CodecError::MissingItemFactory | CodecError::MissingOptionTarget => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn args_error(context: &str, err: ArgsError) -> CliError {
    match err {
        ArgsError::Codec(err) => codec_error(context, err),
        ArgsError::Argument { index, source } => {
            args_error(&format!("{context}: argument {index}"), *source)
        }
        ArgsError::NotLast { .. } => CliError::usage(format!("{context}: {err}")),
        ArgsError::MissingItemFactory | ArgsError::MissingOptionalTarget => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn type_error(flag: &str, err: TypeParseError) -> CliError {
    CliError::usage(format!("{flag}: {err}"))
}

pub fn json_error(flag: &str, err: JsonValueError) -> CliError {
    CliError::usage(format!("{flag}: {err}"))
}
