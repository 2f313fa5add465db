use std::io::Read;

use clap::{Args, Subcommand};
use vmabi::args::DEFAULT_PARTS_SEPARATOR;
use vmabi::codec::{Context, DEFAULT_MAX_LENGTH};

use crate::exit::{io_error, type_error, CliError, CliResult};
use crate::output::OutputFormat;
use crate::typeexpr::TypeExpr;

pub mod decode;
pub mod deserialize;
pub mod encode;
pub mod serialize;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON value as hex.
    Encode(EncodeArgs),
    /// Decode hex (or binary stdin) into a JSON value.
    Decode(DecodeArgs),
    /// Serialize call arguments into separated hex parts.
    Serialize(SerializeArgs),
    /// Deserialize separated hex parts into call arguments.
    Deserialize(DeserializeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Serialize(args) => serialize::run(args, format),
        Command::Deserialize(args) => deserialize::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Value type, e.g. `u32` or `struct { a: u8, b: List<bytes> }`.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub ty: String,
    /// Value as JSON.
    #[arg(long, value_name = "JSON")]
    pub value: String,
    /// Use the top-level encoding instead of the nested one.
    #[arg(long)]
    pub top_level: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Value type, e.g. `u32` or `struct { a: u8, b: List<bytes> }`.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub ty: String,
    /// Hex input, or `-` to read from stdin.
    #[arg(default_value = "-")]
    pub data: String,
    /// Decode the top-level encoding instead of the nested one.
    #[arg(long)]
    pub top_level: bool,
    /// Treat stdin as raw bytes. Nested mode decodes values until EOF.
    #[arg(long)]
    pub binary: bool,
    /// Largest accepted length prefix.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
}

#[derive(Args, Debug)]
pub struct SerializeArgs {
    /// Argument as `TYPE=JSON`. Repeat for each argument, in order.
    #[arg(long = "arg", value_name = "TYPE=JSON")]
    pub args: Vec<String>,
    /// Trailing optional argument as `TYPE=JSON`; `null` leaves it out.
    #[arg(long, value_name = "TYPE=JSON", conflicts_with = "variadic")]
    pub optional: Option<String>,
    /// Trailing variadic argument as `TYPE=JSON_ARRAY`.
    #[arg(long, value_name = "TYPE=JSON_ARRAY")]
    pub variadic: Option<String>,
    /// Separator between parts.
    #[arg(long, default_value = DEFAULT_PARTS_SEPARATOR)]
    pub separator: String,
}

#[derive(Args, Debug)]
pub struct DeserializeArgs {
    /// Argument type. Repeat for each argument, in order.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub types: Vec<String>,
    /// Type of a trailing optional argument.
    #[arg(long, value_name = "TYPE", conflicts_with = "variadic")]
    pub optional: Option<String>,
    /// Item type of a trailing variadic argument.
    #[arg(long, value_name = "TYPE")]
    pub variadic: Option<String>,
    /// Serialized arguments, or `-` to read from stdin.
    #[arg(default_value = "-")]
    pub data: String,
    /// Separator between parts.
    #[arg(long, default_value = DEFAULT_PARTS_SEPARATOR)]
    pub separator: String,
    /// Largest accepted length prefix.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn context(top_level: bool) -> Context {
    if top_level {
        Context::TopLevel
    } else {
        Context::Nested
    }
}

pub(crate) fn parse_type(flag: &str, input: &str) -> CliResult<TypeExpr> {
    input.parse().map_err(|err| type_error(flag, err))
}

pub(crate) fn parse_json(flag: &str, input: &str) -> CliResult<serde_json::Value> {
    serde_json::from_str(input)
        .map_err(|err| CliError::usage(format!("{flag} is not valid JSON: {err}")))
}

/// Split `TYPE=JSON` at the first `=`. Type expressions never contain one.
pub(crate) fn split_typed_value<'a>(flag: &str, input: &'a str) -> CliResult<(&'a str, &'a str)> {
    input
        .split_once('=')
        .ok_or_else(|| CliError::usage(format!("{flag} expects TYPE=JSON, got `{input}`")))
}

/// Positional text input; `-` reads stdin.
pub(crate) fn read_text_input(data: &str) -> CliResult<String> {
    if data != "-" {
        return Ok(data.trim().to_string());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(text.trim().to_string())
}

pub(crate) fn decode_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(digits).map_err(|err| CliError::usage(format!("input is not valid hex: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_equals() {
        assert_eq!(
            split_typed_value("--arg", "string=\"a=b\"").unwrap(),
            ("string", "\"a=b\"")
        );
        assert!(split_typed_value("--arg", "u8").is_err());
    }

    #[test]
    fn hex_input_accepts_prefix() {
        assert_eq!(decode_hex("0x0102").unwrap(), vec![1, 2]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_hex("zz").unwrap_err().code, crate::exit::USAGE);
    }
}
