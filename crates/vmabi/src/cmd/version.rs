use vmabi::args::DEFAULT_PARTS_SEPARATOR;
use vmabi::codec::{ADDRESS_LEN, DEFAULT_MAX_LENGTH, LENGTH_PREFIX_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("vmabi {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: vmabi");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("VMABI_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("VMABI_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("length_prefix: {LENGTH_PREFIX_SIZE} bytes, big-endian");
    println!("address_length: {ADDRESS_LEN}");
    println!("default_max_length: {DEFAULT_MAX_LENGTH}");
    println!("parts_separator: {DEFAULT_PARTS_SEPARATOR}");

    Ok(SUCCESS)
}
