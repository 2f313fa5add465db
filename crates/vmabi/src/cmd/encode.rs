use tracing::debug;
use vmabi::codec::{Codec, ValueWriter};

use crate::cmd::{context, parse_json, parse_type, EncodeArgs};
use crate::exit::{codec_error, json_error, CliResult, SUCCESS};
use crate::json::value_from_json;
use crate::output::{context_name, print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let ty = parse_type("--type", &args.ty)?;
    let json = parse_json("--value", &args.value)?;
    let value = value_from_json(&ty, &json).map_err(|err| json_error("--value", err))?;
    let ctx = context(args.top_level);
    debug!(ty = %ty, context = context_name(ctx), "encoding value");

    if let OutputFormat::Raw = format {
        let mut writer = ValueWriter::new(std::io::stdout().lock());
        writer
            .write_value(&value, ctx)
            .map_err(|err| codec_error("encode failed", err))?;
        return Ok(SUCCESS);
    }

    let codec = Codec::new();
    let bytes = if args.top_level {
        codec.encode_top_level(&value)
    } else {
        codec.encode_nested(&value)
    }
    .map_err(|err| codec_error("encode failed", err))?;

    print_encoded(&ty, ctx, &bytes, format);
    Ok(SUCCESS)
}
