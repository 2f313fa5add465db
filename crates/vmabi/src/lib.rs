//! Binary ABI codec for smart-contract virtual machine values.
//!
//! # Crate Structure
//!
//! - [`codec`]: value model, nested and top-level encodings, stream adapters
//! - [`args`]: call-argument serialization into `@`-separated hex parts
//!
//! ```
//! use vmabi::codec::{decode_top_level, encode_top_level, Value};
//!
//! let bytes = encode_top_level(&Value::U32(256)).unwrap();
//! assert_eq!(&bytes[..], &[0x01, 0x00]);
//!
//! let mut target = Value::U32(0);
//! decode_top_level(&mut target, &bytes).unwrap();
//! assert_eq!(target, Value::U32(256));
//! ```

/// Re-export codec types.
pub mod codec {
    pub use vmabi_codec::*;
}

/// Re-export argument serializer types.
pub mod args {
    pub use vmabi_args::*;
}
