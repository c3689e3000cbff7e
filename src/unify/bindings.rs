//! Bindings: the substitution threaded through resolution.

use std::collections::HashMap;
use std::fmt;

use crate::syntax::{Fact, Term, Var};

/// A substitution mapping variable names to terms.
///
/// Bindings are mutated in place by [`Bindings::bind`]; callers that may fail
/// part-way clone first and only keep the surviving copy. Variable-to-variable
/// links are followed by [`Bindings::dereference`], so a variable may be bound
/// to another variable that is itself bound later.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    map: HashMap<String, Term>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings {
            map: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The term `var` is directly bound to, without following chains.
    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.map.get(var.name())
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.map.contains_key(var.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Follow variable links until reaching a non-variable or an unbound
    /// variable.
    pub fn dereference(&self, term: &Term) -> Term {
        let mut current = term;
        // Chains never revisit a variable; the bound only guards malformed input.
        for _ in 0..=self.map.len() {
            match current {
                Term::Var(v) => match self.map.get(v.name()) {
                    Some(next) => current = next,
                    None => break,
                },
                _ => break,
            }
        }
        current.clone()
    }

    /// Resolve `term` completely, rebuilding facts with their arguments
    /// grounded. A variable with no non-variable value is returned as written.
    pub fn ground(&self, term: &Term) -> Term {
        let mut expanding = Vec::new();
        self.ground_inner(term, &mut expanding)
    }

    pub fn ground_fact(&self, fact: &Fact) -> Fact {
        let mut expanding = Vec::new();
        self.ground_fact_inner(fact, &mut expanding)
    }

    fn ground_inner<'a>(&'a self, term: &'a Term, expanding: &mut Vec<&'a str>) -> Term {
        match term {
            Term::Var(v) => {
                // Re-entry means the value contains the variable itself.
                if expanding.contains(&v.name()) {
                    return term.clone();
                }
                match self.map.get(v.name()) {
                    None => term.clone(),
                    Some(next) => {
                        expanding.push(v.name());
                        let out = self.ground_inner(next, expanding);
                        expanding.pop();
                        if out.is_var() {
                            term.clone()
                        } else {
                            out
                        }
                    }
                }
            }
            Term::Fact(fact) => Term::Fact(self.ground_fact_inner(fact, expanding)),
            other => other.clone(),
        }
    }

    fn ground_fact_inner<'a>(&'a self, fact: &'a Fact, expanding: &mut Vec<&'a str>) -> Fact {
        Fact {
            functor: fact.functor.clone(),
            args: fact
                .args
                .iter()
                .map(|arg| self.ground_inner(arg, expanding))
                .collect(),
        }
    }

    /// Bind `var` to `value`.
    ///
    /// If `var` is already linked to another unbound variable the binding is
    /// placed on that variable instead. If it already has a value, succeeds
    /// only when that value equals `value`, and nothing changes either way.
    /// Fails without change when `value` contains `var`, so no binding cycle
    /// is ever created.
    pub fn bind(&mut self, var: &Var, value: Term) -> bool {
        match self.dereference(&Term::Var(var.clone())) {
            Term::Var(root) => {
                if let Term::Var(target) = self.dereference(&value) {
                    if target == root {
                        return true;
                    }
                }
                if self.occurs(&root, &value) {
                    return false;
                }
                self.map.insert(root.name().to_string(), value);
                true
            }
            bound => same_term(&self.ground(&bound), &self.ground(&value)),
        }
    }

    /// Whether `var` is reachable from `term` through facts and bindings.
    fn occurs(&self, var: &Var, term: &Term) -> bool {
        let mut expanding = Vec::new();
        self.occurs_inner(var, term, &mut expanding)
    }

    fn occurs_inner<'a>(&'a self, var: &Var, term: &'a Term, expanding: &mut Vec<&'a str>) -> bool {
        match term {
            Term::Var(v) if v == var => true,
            Term::Var(v) => {
                if expanding.contains(&v.name()) {
                    return false;
                }
                match self.map.get(v.name()) {
                    None => false,
                    Some(next) => {
                        expanding.push(v.name());
                        let found = self.occurs_inner(var, next, expanding);
                        expanding.pop();
                        found
                    }
                }
            }
            Term::Fact(fact) => fact
                .args
                .iter()
                .any(|arg| self.occurs_inner(var, arg, expanding)),
            _ => false,
        }
    }
}

/// Same discriminant and same rendering.
pub(crate) fn same_term(a: &Term, b: &Term) -> bool {
    a.kind() == b.kind() && a.to_string() == b.to_string()
}

impl PartialEq for Bindings {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self.map.iter().all(|(k, v)| match other.map.get(k) {
                Some(w) => same_term(v, w),
                None => false,
            })
    }
}

impl FromIterator<(Var, Term)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (Var, Term)>>(iter: I) -> Self {
        Bindings {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.name().to_string(), v))
                .collect(),
        }
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "{{")?;
        for (i, (k, v)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}
