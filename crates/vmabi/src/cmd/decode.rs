use tracing::debug;
use vmabi::codec::{Codec, CodecConfig, CodecError, Context, ValueReader};

use crate::cmd::{context, decode_hex, parse_type, read_text_input, DecodeArgs};
use crate::exit::{codec_error, CliError, CliResult, SUCCESS};
use crate::output::{context_name, print_decoded, OutputFormat};
use crate::typeexpr::TypeExpr;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let ty = parse_type("--type", &args.ty)?;
    let ctx = context(args.top_level);
    let codec = Codec::with_config(CodecConfig {
        max_length: args.max_length,
    });
    debug!(ty = %ty, context = context_name(ctx), "decoding value");

    if args.binary {
        if args.data != "-" {
            return Err(CliError::usage("--binary reads from stdin; drop the DATA argument"));
        }
        return decode_stream(&ty, ctx, codec, format);
    }

    let data = decode_hex(&read_text_input(&args.data)?)?;
    let mut target = ty.target();
    match ctx {
        Context::TopLevel => codec.decode_top_level(&mut target, &data),
        Context::Nested => {
            let mut src = &data[..];
            codec.decode_nested(&mut target, &mut src).and_then(|()| {
                if src.is_empty() {
                    Ok(())
                } else {
                    Err(CodecError::TrailingBytes(src.len()))
                }
            })
        }
    }
    .map_err(|err| codec_error("decode failed", err))?;

    print_decoded(&ty, ctx, &target, format);
    Ok(SUCCESS)
}

fn decode_stream(ty: &TypeExpr, ctx: Context, codec: Codec, format: OutputFormat) -> CliResult<i32> {
    let mut reader = ValueReader::with_codec(std::io::stdin().lock(), codec);

    if ctx == Context::TopLevel {
        let mut target = ty.target();
        reader
            .read_top_level(&mut target)
            .map_err(|err| codec_error("decode failed", err))?;
        print_decoded(ty, ctx, &target, format);
        return Ok(SUCCESS);
    }

    let mut count = 0usize;
    loop {
        let mut target = ty.target();
        match reader.read_nested(&mut target) {
            Ok(()) => {
                count += 1;
                print_decoded(ty, ctx, &target, format);
            }
            Err(CodecError::StreamClosed) => break,
            Err(err) => return Err(codec_error(&format!("decode failed after {count} values"), err)),
        }
    }
    debug!(count, "stream decoded");
    Ok(SUCCESS)
}
