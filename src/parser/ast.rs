//! Shell-level AST: program statements plus directives.

use crate::syntax::Statement;

/// One unit of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Statement(Statement),
    Directive(Directive),
}

/// A `:`-prefixed shell directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Load a source or compiled file
    Load(String),
    /// Set a configuration option
    Set { key: String, value: String },
    /// Ask for the next answer of the active query
    Next,
    /// Leave the shell
    Quit,
}
