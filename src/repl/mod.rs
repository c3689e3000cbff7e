//! Interactive shell.

mod repl;

pub use repl::{Repl, ReplError};
