//! Session: end-to-end API for loading programs and answering queries.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::parser::{parse_file, parse_query, Directive, ParseError};
use crate::raw::{self, RawError};
use crate::resolver::{QueryResult, QueryStream, ResolveError, Resolver, ResolverConfig};
use crate::syntax::{Query, Statement, Term, Var};
use crate::theory::{Indexer, Theory};
use crate::unify::Bindings;

/// One answer, restricted to the variables written in the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub bindings: Vec<(Var, Term)>,
}

impl Answer {
    /// Project `solution` onto `variables`. Variables without a value and
    /// anonymous `_` variables are left out.
    pub fn project(variables: &[Var], solution: &Bindings) -> Self {
        let bindings = variables
            .iter()
            .filter(|v| !v.name().starts_with('_'))
            .filter_map(|v| {
                let value = solution.ground(&Term::Var(v.clone()));
                (!value.is_var()).then(|| (v.clone(), value))
            })
            .collect();
        Answer { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings
            .iter()
            .find(|(v, _)| v.name() == name)
            .map(|(_, t)| t)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "Yes.");
        }
        for (i, (var, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", var, value)?;
        }
        Ok(())
    }
}

/// Outcome of asking for an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryReply {
    Answer(Answer),
    Exhausted,
}

impl fmt::Display for QueryReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryReply::Answer(answer) => write!(f, "{}", answer),
            QueryReply::Exhausted => write!(f, "No."),
        }
    }
}

/// Result of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    StatementAdded,
    Query(QueryReply),
}

/// Result of applying a directive.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveResult {
    Loaded { path: String, statements: usize },
    Set { key: String, value: String },
    Next(QueryReply),
    Quit,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot load {path}: {source}")]
    Raw {
        path: String,
        #[source]
        source: RawError,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("no active query")]
    NoActiveQuery,
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

struct ActiveQuery {
    variables: Vec<Var>,
    stream: QueryStream,
}

/// A session holds the knowledge base, the resolver configuration and the
/// query currently being answered.
pub struct Session {
    theory: Arc<Theory>,
    resolver: Resolver,
    config: ResolverConfig,
    active_query: Option<ActiveQuery>,
}

impl Session {
    /// Create a new empty session writing program output to stdout.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self::with_output(config, Box::new(io::stdout()))
    }

    /// Create a session whose `writeln/1` output goes to `output`.
    pub fn with_output(config: ResolverConfig, output: Box<dyn Write + Send>) -> Self {
        let theory = Arc::new(Theory::new());
        let indexer: Arc<dyn Indexer + Send + Sync> = theory.clone();
        Session {
            resolver: Resolver::with_output(indexer, config.clone(), output),
            theory,
            config,
            active_query: None,
        }
    }

    /// Store a fact or rule, or start answering a query.
    pub fn execute_statement(&mut self, stmt: Statement) -> Result<ExecResult, SessionError> {
        match stmt {
            Statement::Query(query) => Ok(ExecResult::Query(self.execute_query(&query)?)),
            other => {
                self.theory.index_statement(other);
                Ok(ExecResult::StatementAdded)
            }
        }
    }

    /// Start answering `query` and return its first answer. Any previously
    /// active query is dropped.
    pub fn execute_query(&mut self, query: &Query) -> Result<QueryReply, SessionError> {
        self.active_query = Some(ActiveQuery {
            variables: query.variables(),
            stream: self.resolver.query(query),
        });
        self.next_answer()
    }

    /// Parse and run query text such as `?- f(X).`
    pub fn execute_query_str(&mut self, source: &str) -> Result<QueryReply, SessionError> {
        let query = parse_query(source)?;
        self.execute_query(&query)
    }

    /// Next answer of the active query.
    pub fn next_answer(&mut self) -> Result<QueryReply, SessionError> {
        let active = self
            .active_query
            .as_mut()
            .ok_or(SessionError::NoActiveQuery)?;
        match active.stream.next_answer() {
            QueryResult::Answer(solution) => {
                Ok(QueryReply::Answer(Answer::project(&active.variables, &solution)))
            }
            QueryResult::Exhausted => {
                self.active_query = None;
                Ok(QueryReply::Exhausted)
            }
            QueryResult::Failed(err) => {
                self.active_query = None;
                Err(err.into())
            }
        }
    }

    pub fn has_active_query(&self) -> bool {
        self.active_query.is_some()
    }

    /// Load program text, or a compiled file if its first non-blank character
    /// is `{`. Facts and rules are stored; queries are run to completion.
    pub fn load_file(&mut self, path: &str) -> Result<DirectiveResult, SessionError> {
        let text = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_string(),
            source,
        })?;

        let statements = if text.trim_start().starts_with('{') {
            raw::deserialize(text.as_bytes())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| SessionError::Raw {
                    path: path.to_string(),
                    source,
                })?
        } else {
            parse_file(&text)?
        };

        let count = statements.len();
        for stmt in statements {
            match stmt {
                Statement::Query(query) => self.run_to_completion(&query)?,
                other => self.theory.index_statement(other),
            }
        }
        info!("loaded {} statements from {}", count, path);
        Ok(DirectiveResult::Loaded {
            path: path.to_string(),
            statements: count,
        })
    }

    fn run_to_completion(&self, query: &Query) -> Result<(), SessionError> {
        let mut stream = self.resolver.query(query);
        let mut answers = 0usize;
        for solution in &mut stream {
            solution?;
            answers += 1;
        }
        debug!("{} produced {} answers", query, answers);
        Ok(())
    }

    pub fn apply_directive(&mut self, directive: Directive) -> Result<DirectiveResult, SessionError> {
        match directive {
            Directive::Load(path) => self.load_file(&path),
            Directive::Set { key, value } => self.set_option(&key, &value),
            Directive::Next => Ok(DirectiveResult::Next(self.next_answer()?)),
            Directive::Quit => Ok(DirectiveResult::Quit),
        }
    }

    /// Update the configuration from a key/value pair.
    ///
    /// Supported keys: `max_depth` (a number, or `none` for unlimited).
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<DirectiveResult, SessionError> {
        match key {
            "max_depth" => {
                let max_depth = match value {
                    "none" | "unlimited" => None,
                    n => Some(n.parse::<usize>().map_err(|_| SessionError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?),
                };
                self.config.max_depth = max_depth;
            }
            _ => return Err(SessionError::UnknownOption(key.to_string())),
        }
        self.resolver = self.resolver.reconfigured(self.config.clone());
        Ok(DirectiveResult::Set {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Access the knowledge base.
    pub fn theory(&self) -> &Theory {
        &self.theory
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
