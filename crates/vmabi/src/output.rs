use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use vmabi::codec::{Context, Value};

use crate::json::value_to_json;
use crate::typeexpr::TypeExpr;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    #[serde(rename = "type")]
    type_name: String,
    context: &'static str,
    size: usize,
    hex: String,
}

#[derive(Serialize)]
struct DecodedOutput {
    #[serde(rename = "type")]
    type_name: String,
    context: &'static str,
    value: serde_json::Value,
}

#[derive(Serialize)]
struct SerializedOutput<'a> {
    data: &'a str,
    parts: usize,
}

#[derive(Serialize)]
struct ArgumentOutput {
    index: usize,
    #[serde(rename = "type")]
    type_name: String,
    value: serde_json::Value,
}

pub fn print_encoded(ty: &TypeExpr, ctx: Context, bytes: &[u8], format: OutputFormat) {
    let hex = hex::encode(bytes);
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                type_name: ty.to_string(),
                context: context_name(ctx),
                size: bytes.len(),
                hex,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["TYPE", "CONTEXT", "SIZE", "HEX"]);
            table.add_row(vec![
                ty.to_string(),
                context_name(ctx).to_string(),
                bytes.len().to_string(),
                hex,
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{hex}"),
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_decoded(ty: &TypeExpr, ctx: Context, value: &Value, format: OutputFormat) {
    let rendered = value_to_json(value);
    match format {
        OutputFormat::Json => {
            let out = DecodedOutput {
                type_name: ty.to_string(),
                context: context_name(ctx),
                value: rendered,
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["TYPE", "CONTEXT", "VALUE"]);
            table.add_row(vec![
                ty.to_string(),
                context_name(ctx).to_string(),
                rendered.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(&rendered).unwrap_or_else(|_| rendered.to_string())
        ),
        OutputFormat::Raw => println!("{rendered}"),
    }
}

pub fn print_serialized(data: &str, parts: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&SerializedOutput { data, parts }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["PARTS", "DATA"]);
            table.add_row(vec![parts.to_string(), data.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{data}"),
        OutputFormat::Raw => print_raw(data.as_bytes()),
    }
}

pub fn print_arguments(args: &[(String, Value)], format: OutputFormat) {
    let rows: Vec<ArgumentOutput> = args
        .iter()
        .enumerate()
        .map(|(index, (label, value))| ArgumentOutput {
            index,
            type_name: label.clone(),
            value: value_to_json(value),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "TYPE", "VALUE"]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.type_name.clone(),
                    row.value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!("{}: {} = {}", row.index, row.type_name, row.value);
            }
        }
        OutputFormat::Raw => {
            let values: Vec<&serde_json::Value> = rows.iter().map(|row| &row.value).collect();
            println!(
                "{}",
                serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string())
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn context_name(ctx: Context) -> &'static str {
    match ctx {
        Context::Nested => "nested",
        Context::TopLevel => "top-level",
    }
}

fn print_json<T: Serialize>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}
