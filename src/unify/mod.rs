//! Unification: bindings and the unifier used by resolution.

mod bindings;
mod unify;

pub use bindings::Bindings;
pub use unify::{unify, unify_facts};
