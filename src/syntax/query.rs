//! Goals and queries: ordered conjunctions to be proven left to right.

use std::fmt;

use super::{Fact, MathAssignment, Renaming, Var};

/// A single goal of a conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    Fact(Fact),
    Math(MathAssignment),
}

impl Goal {
    pub fn variables(&self) -> Vec<Var> {
        match self {
            Goal::Fact(fact) => fact.variables(),
            Goal::Math(ma) => ma.variables(),
        }
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> Goal {
        match self {
            Goal::Fact(fact) => Goal::Fact(fact.rename_with(renaming)),
            Goal::Math(ma) => Goal::Math(ma.rename_with(renaming)),
        }
    }
}

impl From<Fact> for Goal {
    fn from(fact: Fact) -> Self {
        Goal::Fact(fact)
    }
}

impl From<MathAssignment> for Goal {
    fn from(ma: MathAssignment) -> Self {
        Goal::Math(ma)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Fact(fact) => write!(f, "{}", fact),
            Goal::Math(ma) => write!(f, "{}", ma),
        }
    }
}

/// A conjunctive query. Also used as the body of a rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub goals: Vec<Goal>,
}

impl Query {
    pub fn new(goals: Vec<Goal>) -> Self {
        Query { goals }
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Variables of all goals, in first-occurrence order.
    pub fn variables(&self) -> Vec<Var> {
        let mut out: Vec<Var> = Vec::new();
        for goal in &self.goals {
            for v in goal.variables() {
                if !out.contains(&v) {
                    out.push(v);
                }
            }
        }
        out
    }

    pub fn rename_with(&self, renaming: &mut Renaming) -> Query {
        Query {
            goals: self.goals.iter().map(|g| g.rename_with(renaming)).collect(),
        }
    }

    pub(crate) fn fmt_goals(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, goal) in self.goals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", goal)?;
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?- ")?;
        self.fmt_goals(f)
    }
}
