//! Terms: variables, atoms, strings, numbers and compound facts.

use std::fmt;

use super::{Renaming, Signature};

/// Functor of list cells: `|()` is the empty list and `|(H, T)` a cons cell.
pub const LIST_FUNCTOR: &str = "|";

/// Discriminant of a [`Term`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Variable,
    Atom,
    Str,
    Number,
    Fact,
}

/// A logic variable.
///
/// Two variables denote the same entity iff their names are equal within one
/// substitution. Names starting with an uppercase letter come from source text;
/// `_h<n>` and `_sf<n>` names are introduced by renaming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var {
    name: String,
}

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Var { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A compound term `functor(args...)`. Zero-argument facts are plain
/// predicates such as `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub functor: String,
    pub args: Vec<Term>,
}

impl Fact {
    pub fn new(functor: impl Into<String>, args: Vec<Term>) -> Self {
        Fact {
            functor: functor.into(),
            args,
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.functor.clone(), self.args.len())
    }

    /// Variables occurring anywhere in this fact, in first-occurrence order.
    pub fn variables(&self) -> Vec<Var> {
        let mut out = Vec::new();
        for arg in &self.args {
            arg.collect_variables(&mut out);
        }
        out
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_ground)
    }

    pub fn is_list(&self) -> bool {
        self.functor == LIST_FUNCTOR && (self.args.is_empty() || self.args.len() == 2)
    }

    /// Rename every variable through `renaming`, sharing names across calls.
    pub fn rename_with(&self, renaming: &mut Renaming) -> Fact {
        Fact {
            functor: self.functor.clone(),
            args: self.args.iter().map(|a| a.rename_with(renaming)).collect(),
        }
    }

    fn fmt_list(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut cell = self;
        let mut first = true;
        loop {
            if cell.args.is_empty() {
                break;
            }
            if !first {
                write!(f, ",")?;
            }
            first = false;
            write!(f, "{}", cell.args[0])?;
            match &cell.args[1] {
                Term::Fact(next) if next.is_list() => cell = next,
                tail => {
                    write!(f, "|{}", tail)?;
                    break;
                }
            }
        }
        write!(f, "]")
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_list() {
            return self.fmt_list(f);
        }
        if self.args.is_empty() {
            return write!(f, "{}", self.functor);
        }
        write!(f, "{}(", self.functor)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// A logic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(Var),
    Atom(String),
    Str(String),
    Number(f64),
    Fact(Fact),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Var::new(name))
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Term::Str(text.into())
    }

    pub fn number(value: f64) -> Self {
        Term::Number(value)
    }

    pub fn fact(functor: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Fact(Fact::new(functor, args))
    }

    pub fn empty_list() -> Self {
        Term::fact(LIST_FUNCTOR, Vec::new())
    }

    /// Build `[items...]` or `[items...|tail]` out of nested `|/2` cells.
    pub fn list(items: Vec<Term>, tail: Option<Term>) -> Self {
        let mut acc = tail.unwrap_or_else(Term::empty_list);
        for item in items.into_iter().rev() {
            acc = Term::fact(LIST_FUNCTOR, vec![item, acc]);
        }
        acc
    }

    pub fn kind(&self) -> TermKind {
        match self {
            Term::Var(_) => TermKind::Variable,
            Term::Atom(_) => TermKind::Atom,
            Term::Str(_) => TermKind::Str,
            Term::Number(_) => TermKind::Number,
            Term::Fact(_) => TermKind::Fact,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fact(&self) -> Option<&Fact> {
        match self {
            Term::Fact(fact) => Some(fact),
            _ => None,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Text of an atom or string literal.
    pub fn text(&self) -> Option<&str> {
        match self {
            Term::Atom(s) | Term::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Var(_) => false,
            Term::Fact(fact) => fact.is_ground(),
            _ => true,
        }
    }

    /// Variables occurring in this term, in first-occurrence order.
    pub fn variables(&self) -> Vec<Var> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    pub(crate) fn collect_variables(&self, out: &mut Vec<Var>) {
        match self {
            Term::Var(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Term::Fact(fact) => {
                for arg in &fact.args {
                    arg.collect_variables(out);
                }
            }
            _ => {}
        }
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> Term {
        match self {
            Term::Var(v) => Term::Var(renaming.rename(v)),
            Term::Fact(fact) => Term::Fact(fact.rename_with(renaming)),
            other => other.clone(),
        }
    }
}

impl From<Fact> for Term {
    fn from(fact: Fact) -> Self {
        Term::Fact(fact)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{}", v),
            Term::Atom(name) => write!(f, "{}", name),
            Term::Str(text) => write!(f, "\"{}\"", text),
            // Debug keeps a fractional part on integral values: 14.0, not 14.
            Term::Number(n) => write!(f, "{:?}", n),
            Term::Fact(fact) => write!(f, "{}", fact),
        }
    }
}
