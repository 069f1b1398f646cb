//! Configuration
//!
//! `navhud.toml` is compiled into the firmware. The build script checks it
//! with the `toml` crate against these same types; at runtime it is read by
//! the allocation-free parser in [`parser`].

pub mod parser;
pub mod types;

pub use parser::{parse_config, ParseError};
pub use types::*;
