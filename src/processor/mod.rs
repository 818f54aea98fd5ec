//! The functional core: script text → typed commands.
//!
//! `lexer` splits argument lists, `script_parser` applies the line grammar,
//! `validate` and `legend` derive extra information from a parsed `Script`.
pub mod ast;
pub mod legend;
pub mod lexer;
pub mod script_parser;
pub mod validate;

pub use ast::{Command, Script};
pub use script_parser::{parse, parse_line};
