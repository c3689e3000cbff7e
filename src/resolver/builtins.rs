//! Built-in predicates tried before the knowledge base.

use std::iter;

use tracing::{debug, warn};

use super::stream::ResolveError;
use super::{Resolver, Solutions};
use crate::raw;
use crate::syntax::{Fact, Statement, Term};
use crate::unify::{unify, Bindings};

/// A predicate implemented by the engine itself.
pub trait Builtin {
    /// Returns `None` if this builtin does not handle `goal`, otherwise the
    /// complete solution stream for it.
    fn resolve(&self, resolver: &Resolver, goal: &Fact, subst: &Bindings) -> Option<Solutions>;
}

/// The builtins in dispatch order.
pub fn default_builtins() -> Vec<Box<dyn Builtin + Send + Sync>> {
    vec![
        Box::new(Unify),
        Box::new(WriteLn),
        Box::new(True),
        Box::new(Fail),
        Box::new(Assert),
    ]
}

fn once(subst: Bindings) -> Solutions {
    Box::new(iter::once(subst))
}

fn none() -> Solutions {
    Box::new(iter::empty())
}

/// `A = B`
pub struct Unify;

impl Builtin for Unify {
    fn resolve(&self, _resolver: &Resolver, goal: &Fact, subst: &Bindings) -> Option<Solutions> {
        if !goal.signature().matches("=", 2) {
            return None;
        }
        Some(Box::new(unify(&goal.args[0], &goal.args[1], subst).into_iter()))
    }
}

/// `writeln(X)` writes `X`, grounded, followed by a newline.
pub struct WriteLn;

impl Builtin for WriteLn {
    fn resolve(&self, resolver: &Resolver, goal: &Fact, subst: &Bindings) -> Option<Solutions> {
        if !goal.signature().matches("writeln", 1) {
            return None;
        }
        let resolver = resolver.clone();
        let text = subst.ground(&goal.args[0]).to_string();
        let subst = subst.clone();
        Some(Box::new(
            iter::once_with(move || match resolver.write_line(&text) {
                Ok(()) => Some(subst),
                Err(err) => {
                    resolver.report(ResolveError::Output(err));
                    None
                }
            })
            .flatten(),
        ))
    }
}

pub struct True;

impl Builtin for True {
    fn resolve(&self, _resolver: &Resolver, goal: &Fact, subst: &Bindings) -> Option<Solutions> {
        goal.signature()
            .matches("true", 0)
            .then(|| once(subst.clone()))
    }
}

pub struct Fail;

impl Builtin for Fail {
    fn resolve(&self, _resolver: &Resolver, goal: &Fact, _subst: &Bindings) -> Option<Solutions> {
        goal.signature().matches("fail", 0).then(none)
    }
}

/// `assert(Fact)` adds a fact; `assert("file")` loads a compiled file.
pub struct Assert;

impl Builtin for Assert {
    fn resolve(&self, resolver: &Resolver, goal: &Fact, subst: &Bindings) -> Option<Solutions> {
        if !goal.signature().matches("assert", 1) {
            return None;
        }
        let resolver = resolver.clone();
        let arg = subst.ground(&goal.args[0]);
        let subst = subst.clone();
        Some(Box::new(
            iter::once_with(move || assert_term(&resolver, arg).then_some(subst)).flatten(),
        ))
    }
}

fn assert_term(resolver: &Resolver, arg: Term) -> bool {
    let theory = resolver.theory();
    match arg {
        Term::Fact(fact) => {
            debug!("asserting {}", fact);
            theory.index_statement(Statement::Fact(fact));
            true
        }
        Term::Atom(name) => {
            debug!("asserting {}", name);
            theory.index_statement(Statement::Fact(Fact::new(name, Vec::new())));
            true
        }
        Term::Str(path) => match raw::load_file(&path) {
            Ok(statements) => {
                debug!("asserting {} statements from {}", statements.len(), path);
                for statement in statements {
                    theory.index_statement(statement);
                }
                true
            }
            Err(source) => {
                resolver.report(ResolveError::Load { path, source });
                false
            }
        },
        other => {
            warn!("assert/1 expects a fact or a file name, got {}", other);
            false
        }
    }
}
