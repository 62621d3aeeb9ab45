// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Recursive-descent parser for CAN DBC files.
//!
//! A DBC file is the de-facto standard text description of a CAN
//! network: nodes, messages, signals with their bit layout and scaling,
//! value tables, environment variables and typed attributes. This crate
//! turns such files into the [`candbc_model`] data model.
//!
//! ```no_run
//! use candbc_parser::{DbcParser, Source};
//!
//! # fn main() -> Result<(), candbc_parser::DbcError> {
//! let mut parser = DbcParser::new();
//! let mut source = Source::from_file("powertrain.dbc")?;
//! parser.parse(&mut source)?;
//!
//! if let Some(message) = parser.message_by_std_id(0x100) {
//!     for signal in &message.signals {
//!         println!("{}: {} bits @ {}", signal.name, signal.shape.size, signal.start_bit);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Errors carry the file position where parsing stopped, rendered as
//! `path[line, column]: message`.

mod error;
mod parser;
mod source;

pub use error::{DbcError, Location};
pub use parser::DbcParser;
pub use source::{Mark, Source};
