mod cmd;
mod exit;
mod json;
mod logging;
mod output;
mod typeexpr;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "vmabi", version, about = "Smart-contract ABI codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", env = "VMABI_FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        env = "VMABI_LOG_FORMAT",
        default_value = "text",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "VMABI_LOG_LEVEL",
        default_value = "warn",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "vmabi",
            "encode",
            "--type",
            "List<u16>",
            "--value",
            "[1, 2]",
            "--top-level",
        ])
        .expect("encode args should parse");

        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.ty, "List<u16>");
        assert!(args.top_level);
    }

    #[test]
    fn decode_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["vmabi", "decode", "-t", "u8"]).expect("decode args should parse");
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.data, "-");
        assert_eq!(args.max_length, vmabi::codec::DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn rejects_optional_with_variadic() {
        let err = Cli::try_parse_from([
            "vmabi",
            "deserialize",
            "--optional",
            "u8",
            "--variadic",
            "u8",
            "01",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vmabi",
            "serialize",
            "--arg",
            "u8=1",
            "--format",
            "raw",
            "--log-level",
            "error",
        ])
        .expect("global flags should parse anywhere");
        assert!(matches!(cli.format, Some(OutputFormat::Raw)));
        assert!(matches!(cli.log_level, LogLevel::Error));
    }
}
