//! REPL implementation.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::parser::{parse_commands, Command, ParseError};
use crate::session::{DirectiveResult, ExecResult, QueryReply, Session, SessionError};

#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Interactive shell over a [`Session`].
///
/// `?- goals.` starts a query and shows its first answer; `;` or `:next`
/// shows the next one. Lines starting with `:` are directives. Anything else
/// is program text whose facts and rules are added to the knowledge base.
pub struct Repl {
    session: Session,
    quit: bool,
}

impl Repl {
    pub fn new() -> Self {
        Repl::with_session(Session::new())
    }

    pub fn with_session(session: Session) -> Self {
        Repl {
            session,
            quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a `:quit` directive has been processed.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Load a file into the session.
    pub fn load_file(&mut self, path: &str) -> Result<(), ReplError> {
        self.session.load_file(path)?;
        Ok(())
    }

    /// Process a line of input and return the text to show.
    pub fn process_line(&mut self, line: &str) -> Result<String, ReplError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(String::new());
        }
        if line == ";" {
            if !self.session.has_active_query() {
                return Ok(QueryReply::Exhausted.to_string());
            }
            return Ok(self.session.next_answer()?.to_string());
        }

        let mut out = Vec::new();
        for command in parse_commands(line)? {
            debug!("command {:?}", command);
            match command {
                Command::Statement(stmt) => match self.session.execute_statement(stmt)? {
                    ExecResult::Query(reply) => out.push(reply.to_string()),
                    ExecResult::StatementAdded => {}
                },
                Command::Directive(directive) => {
                    let result = self.session.apply_directive(directive)?;
                    if result == DirectiveResult::Quit {
                        self.quit = true;
                        break;
                    }
                    out.push(describe(&result));
                }
            }
        }
        Ok(out.join("\n"))
    }

    /// Run the REPL on stdin/stdout until end of input or `:quit`.
    pub fn run(&mut self) -> Result<(), ReplError> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), ReplError> {
        writeln!(output, "sldlog: Horn-clause logic shell. Type :quit to exit.")?;
        let mut lines = input.lines();
        while !self.quit {
            write!(output, "?- ")?;
            output.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            match self.process_line(&line) {
                Ok(text) if text.is_empty() => {}
                Ok(text) => writeln!(output, "{}", text)?,
                Err(err) => writeln!(output, "Error: {}", err)?,
            }
        }
        output.flush()?;
        Ok(())
    }
}

fn describe(result: &DirectiveResult) -> String {
    match result {
        DirectiveResult::Loaded { path, statements } => {
            format!("Loaded {} statements from {}.", statements, path)
        }
        DirectiveResult::Set { key, value } => format!("{} = {}", key, value),
        DirectiveResult::Next(reply) => reply.to_string(),
        DirectiveResult::Quit => String::new(),
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}
