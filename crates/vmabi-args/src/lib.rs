//! Argument serialization for smart-contract calls.
//!
//! A call's arguments travel as a list of *parts*: each single value is
//! top-level encoded on its own, and the parts are written as lowercase hex
//! joined by a separator (`@` by default):
//!
//! ```text
//! 0a@@68656c6c6f      u8 10, bool false, string "hello"
//! ```
//!
//! On top of single values, [`ArgValue`] models multi-part arguments,
//! optional trailing arguments and variadic tails.

pub mod args;
pub mod config;
pub mod error;
pub mod serializer;

pub use args::{ArgFactory, ArgValue, VariadicValues};
pub use config::{SerializerConfig, DEFAULT_PARTS_SEPARATOR};
pub use error::{ArgsError, Result};
pub use serializer::ArgsSerializer;
