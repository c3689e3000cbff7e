//! Syntax types for Horn-clause programs: terms, arithmetic, goals and statements.

mod math;
mod query;
mod rename;
mod signature;
mod statement;
mod term;

pub use math::{ExprOp, Factor, MathAssignment, MathExpr, Mult, MultOp};
pub use query::{Goal, Query};
pub use rename::Renaming;
pub use signature::Signature;
pub use statement::{Rule, Statement};
pub use term::{Fact, Term, TermKind, Var, LIST_FUNCTOR};
