//! Binary codec for typed smart-contract ABI values.
//!
//! Every value has two encodings:
//! - **nested**: self-delimiting, used when the value sits inside another
//!   value or is followed by more data in the same stream;
//! - **top-level**: minimal, used when the value is the whole payload. Default
//!   values (`false`, `0`, unit enum variant 0, absent option) encode to zero
//!   bytes.
//!
//! Variable-length nested payloads carry a 4-byte big-endian length prefix.
//! Decoding fills in a caller-shaped [`Value`]: the codec never infers struct
//! or enum layouts, and lists build their elements through an
//! [`ItemFactory`].

pub mod composite;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod framing;
pub mod primitives;
pub mod reader;
pub mod stream;
pub mod value;
pub mod writer;

pub use config::{CodecConfig, DEFAULT_MAX_LENGTH};
pub use dispatch::{decode_nested, decode_top_level, encode_nested, encode_top_level, Codec, Context};
pub use error::{CodecError, Result};
pub use framing::{decode_length, encode_length, LENGTH_PREFIX_SIZE};
pub use reader::ValueReader;
pub use value::{EnumValue, Field, ItemFactory, OutputList, StructValue, Value, ADDRESS_LEN};
pub use writer::ValueWriter;

pub use num_bigint as bigint;
