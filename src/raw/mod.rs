//! Raw format: compiled programs as a stream of concatenated JSON values.
//!
//! A compiled file can be loaded without parsing source text, either through
//! the shell or with `assert("file")` from inside a program.

mod codec;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::syntax::Statement;
use codec::{decode_statement, encode_statement, RawNode};

#[derive(Debug, Error)]
pub enum RawError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} node, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown expression operator code {0}")]
    UnknownExprOp(u8),
    #[error("unknown multiplication operator code {0}")]
    UnknownMultOp(u8),
    #[error("factor has no variable, number or expression")]
    InvalidFactor,
}

/// Write each statement as one JSON value followed by a newline.
pub fn serialize<W: Write>(statements: &[Statement], mut writer: W) -> Result<(), RawError> {
    for statement in statements {
        serde_json::to_writer(&mut writer, &encode_statement(statement))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Lazily decode statements from a stream of concatenated JSON values.
pub fn deserialize<R: Read>(reader: R) -> impl Iterator<Item = Result<Statement, RawError>> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<RawNode>()
        .map(|node| node.map_err(RawError::from).and_then(decode_statement))
}

/// Read every statement of a compiled file, stopping at the first error.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<Statement>, RawError> {
    let file = File::open(path)?;
    deserialize(BufReader::new(file)).collect()
}
