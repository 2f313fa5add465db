use tracing::debug;
use vmabi::args::{ArgValue, ArgsSerializer, SerializerConfig, VariadicValues};
use vmabi::codec::Value;

use crate::cmd::{parse_json, parse_type, split_typed_value, SerializeArgs};
use crate::exit::{args_error, json_error, CliError, CliResult, SUCCESS};
use crate::json::value_from_json;
use crate::output::{print_serialized, OutputFormat};
use crate::typeexpr::TypeExpr;

pub fn run(args: SerializeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut values = args
        .args
        .iter()
        .map(|input| typed_value("--arg", input).map(ArgValue::Single))
        .collect::<CliResult<Vec<_>>>()?;

    if let Some(input) = &args.optional {
        let (ty, json) = typed_json("--optional", input)?;
        let arg = if json.is_null() {
            ArgValue::none()
        } else {
            let value = value_from_json(&ty, &json).map_err(|err| json_error("--optional", err))?;
            ArgValue::some(ArgValue::Single(value))
        };
        values.push(arg);
    }

    if let Some(input) = &args.variadic {
        let (ty, json) = typed_json("--variadic", input)?;
        let items = json
            .as_array()
            .ok_or_else(|| CliError::usage("--variadic expects a JSON array"))?
            .iter()
            .map(|item| {
                value_from_json(&ty, item)
                    .map(ArgValue::Single)
                    .map_err(|err| json_error("--variadic", err))
            })
            .collect::<CliResult<Vec<_>>>()?;
        values.push(ArgValue::Variadic(VariadicValues::from_items(items)));
    }

    let serializer = ArgsSerializer::with_config(SerializerConfig {
        parts_separator: args.separator,
        ..SerializerConfig::default()
    });
    let parts = serializer
        .serialize_to_parts(&values)
        .map_err(|err| args_error("serialize failed", err))?;
    debug!(arguments = values.len(), parts = parts.len(), "serialized arguments");

    let data = serializer.join_parts(&parts);
    print_serialized(&data, parts.len(), format);
    Ok(SUCCESS)
}

fn typed_json(flag: &str, input: &str) -> CliResult<(TypeExpr, serde_json::Value)> {
    let (ty, json) = split_typed_value(flag, input)?;
    Ok((parse_type(flag, ty)?, parse_json(flag, json)?))
}

fn typed_value(flag: &str, input: &str) -> CliResult<Value> {
    let (ty, json) = typed_json(flag, input)?;
    value_from_json(&ty, &json).map_err(|err| json_error(flag, err))
}
