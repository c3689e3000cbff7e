//! Unification of terms under a substitution.
//!
//! Binding a variable to a term containing it fails, so `X = f(X)` has no
//! solution and no substitution ever holds a cycle.

use super::Bindings;
use crate::syntax::{Fact, Term};

/// Unify `base` with `query` under `subst`.
///
/// Returns the extended substitution, or `None` if the terms do not unify.
/// `subst` itself is never modified.
pub fn unify(base: &Term, query: &Term, subst: &Bindings) -> Option<Bindings> {
    let base = subst.dereference(base);
    let query = subst.dereference(query);

    match (&base, &query) {
        (Term::Atom(a) | Term::Str(a), Term::Atom(b) | Term::Str(b)) => {
            (a == b).then(|| subst.clone())
        }
        (Term::Number(a), Term::Number(b)) => {
            (format!("{:?}", a) == format!("{:?}", b)).then(|| subst.clone())
        }
        (Term::Var(a), Term::Var(b)) => {
            if a == b {
                return Some(subst.clone());
            }
            let (from, to) = if a.name() < b.name() { (a, b) } else { (b, a) };
            let mut out = subst.clone();
            out.bind(from, Term::Var(to.clone())).then_some(out)
        }
        (Term::Var(v), other) | (other, Term::Var(v)) => {
            let mut out = subst.clone();
            out.bind(v, other.clone()).then_some(out)
        }
        (Term::Fact(a), Term::Fact(b)) => unify_facts(a, b, subst),
        _ => None,
    }
}

/// Unify two facts argument by argument, left to right.
pub fn unify_facts(base: &Fact, query: &Fact, subst: &Bindings) -> Option<Bindings> {
    if base.functor != query.functor || base.args.len() != query.args.len() {
        return None;
    }
    base.args
        .iter()
        .zip(&query.args)
        .try_fold(subst.clone(), |acc, (b, q)| unify(b, q, &acc))
}
