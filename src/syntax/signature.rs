//! Predicate signatures (functor/arity).

use std::fmt;

/// Identifies a family of facts and rules. Stored statements are keyed by the
/// rendered form `functor/arity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub functor: String,
    pub arity: usize,
}

impl Signature {
    pub fn new(functor: impl Into<String>, arity: usize) -> Self {
        Signature {
            functor: functor.into(),
            arity,
        }
    }

    /// Index key used by the knowledge base.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn matches(&self, functor: &str, arity: usize) -> bool {
        self.functor == functor && self.arity == arity
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.functor, self.arity)
    }
}
