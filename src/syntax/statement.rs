//! Top-level program statements.

use std::collections::HashMap;
use std::fmt;

use super::{Fact, Query, Renaming, Signature, Var};

/// `head :- body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub head: Fact,
    pub body: Query,
}

impl Rule {
    pub fn new(head: Fact, body: Query) -> Self {
        Rule { head, body }
    }

    pub fn signature(&self) -> Signature {
        self.head.signature()
    }

    pub fn variables(&self) -> Vec<Var> {
        let mut out = self.head.variables();
        for v in self.body.variables() {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        out
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> Rule {
        Rule {
            head: self.head.rename_with(renaming),
            body: self.body.rename_with(renaming),
        }
    }

    /// Rename head and body through one mapping of fresh `<prefix><n>` names
    /// starting at `start`. Returns the renamed rule, the mapping, and how many
    /// names were consumed.
    pub fn anonymize(&self, start: usize, prefix: &str) -> (Rule, HashMap<String, String>, usize) {
        let mut renaming = Renaming::new(prefix, start);
        let renamed = self.rename_with(&mut renaming);
        let used = renaming.used();
        (renamed, renaming.into_mapping(), used)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        self.body.fmt_goals(f)
    }
}

/// A parsed program statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Fact(Fact),
    Rule(Rule),
    Query(Query),
}

impl Statement {
    /// Signature under which the statement is stored; queries have none.
    pub fn signature(&self) -> Option<Signature> {
        match self {
            Statement::Fact(fact) => Some(fact.signature()),
            Statement::Rule(rule) => Some(rule.signature()),
            Statement::Query(_) => None,
        }
    }

    pub fn variables(&self) -> Vec<Var> {
        match self {
            Statement::Fact(fact) => fact.variables(),
            Statement::Rule(rule) => rule.variables(),
            Statement::Query(query) => query.variables(),
        }
    }

    pub fn anonymize(
        &self,
        start: usize,
        prefix: &str,
    ) -> (Statement, HashMap<String, String>, usize) {
        let mut renaming = Renaming::new(prefix, start);
        let renamed = match self {
            Statement::Fact(fact) => Statement::Fact(fact.rename_with(&mut renaming)),
            Statement::Rule(rule) => Statement::Rule(rule.rename_with(&mut renaming)),
            Statement::Query(query) => Statement::Query(query.rename_with(&mut renaming)),
        };
        let used = renaming.used();
        (renamed, renaming.into_mapping(), used)
    }
}

impl From<Fact> for Statement {
    fn from(fact: Fact) -> Self {
        Statement::Fact(fact)
    }
}

impl From<Rule> for Statement {
    fn from(rule: Rule) -> Self {
        Statement::Rule(rule)
    }
}

impl From<Query> for Statement {
    fn from(query: Query) -> Self {
        Statement::Query(query)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Fact(fact) => write!(f, "{}.", fact),
            Statement::Rule(rule) => write!(f, "{}.", rule),
            Statement::Query(query) => write!(f, "{}.", query),
        }
    }
}
