//! Parser for Horn-clause source text and shell input.

mod ast;
mod lexer;
mod parser;

pub use ast::{Command, Directive};
pub use lexer::LexError;
pub use parser::{parse_commands, parse_file, parse_query, ParseError};
