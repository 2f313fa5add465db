use tracing::debug;
use vmabi::args::{ArgValue, ArgsSerializer, SerializerConfig, VariadicValues};
use vmabi::codec::{CodecConfig, Value};

use crate::cmd::{parse_type, read_text_input, DeserializeArgs};
use crate::exit::{args_error, CliResult, SUCCESS};
use crate::output::{print_arguments, OutputFormat};

pub fn run(args: DeserializeArgs, format: OutputFormat) -> CliResult<i32> {
    let types = args
        .types
        .iter()
        .map(|input| parse_type("--type", input))
        .collect::<CliResult<Vec<_>>>()?;
    let optional = args
        .optional
        .as_deref()
        .map(|input| parse_type("--optional", input))
        .transpose()?;
    let variadic = args
        .variadic
        .as_deref()
        .map(|input| parse_type("--variadic", input))
        .transpose()?;

    let mut outputs: Vec<ArgValue> = types.iter().map(|ty| ArgValue::Single(ty.target())).collect();
    if let Some(ty) = &optional {
        outputs.push(ArgValue::some(ArgValue::Single(ty.target())));
    }
    if let Some(ty) = &variadic {
        let item = ty.clone();
        outputs.push(ArgValue::Variadic(VariadicValues::new(move || {
            ArgValue::Single(item.target())
        })));
    }

    let data = read_text_input(&args.data)?;
    let serializer = ArgsSerializer::with_config(SerializerConfig {
        parts_separator: args.separator,
        codec: CodecConfig {
            max_length: args.max_length,
        },
    });
    serializer
        .deserialize(&data, &mut outputs)
        .map_err(|err| args_error("deserialize failed", err))?;
    debug!(arguments = outputs.len(), "deserialized arguments");

    let mut labels: Vec<String> = types.iter().map(ToString::to_string).collect();
    if let Some(ty) = &optional {
        labels.push(format!("optional {ty}"));
    }
    if let Some(ty) = &variadic {
        labels.push(format!("variadic {ty}"));
    }

    let rows: Vec<(String, Value)> = labels
        .into_iter()
        .zip(outputs)
        .map(|(label, arg)| (label, flatten(arg)))
        .collect();
    print_arguments(&rows, format);
    Ok(SUCCESS)
}

/// Collapse an argument into one displayable value.
fn flatten(arg: ArgValue) -> Value {
    match arg {
        ArgValue::Single(value) => value,
        ArgValue::Multi(items) => Value::InputList(items.into_iter().map(flatten).collect()),
        ArgValue::Optional(None) => Value::none(),
        ArgValue::Optional(Some(inner)) => Value::some(flatten(*inner)),
        ArgValue::Variadic(variadic) => {
            Value::InputList(variadic.items.into_iter().map(flatten).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_arguments() {
        let arg = ArgValue::Variadic(VariadicValues::from_items(vec![
            ArgValue::Single(Value::U8(1)),
            ArgValue::Multi(vec![Value::U8(2).into(), Value::Bool(true).into()]),
        ]));
        assert_eq!(
            flatten(arg),
            Value::InputList(vec![
                Value::U8(1),
                Value::InputList(vec![Value::U8(2), Value::Bool(true)]),
            ])
        );
        assert_eq!(flatten(ArgValue::none()), Value::none());
    }
}
