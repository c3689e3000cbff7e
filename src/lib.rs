//! sldlog: a small Horn-clause logic language.
//!
//! Programs are facts and rules over first-order terms. Queries are answered
//! by depth-first SLD resolution, producing each satisfying substitution
//! lazily through a pull-based stream.

pub mod syntax;
pub mod unify;
pub mod theory;
pub mod resolver;
pub mod raw;
pub mod parser;
pub mod session;
pub mod repl;
