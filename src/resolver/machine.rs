//! The search loop behind every solution stream.
//!
//! Pending work is a linked list of frames (`Cont`) shared between sibling
//! branches, and untried alternatives sit on an explicit choice stack, so the
//! native stack stays flat however deep the proof gets.

use std::sync::Arc;

use tracing::warn;

use super::Resolver;
use crate::syntax::{Goal, Statement, Term, Var};
use crate::unify::Bindings;

/// Untried alternatives for one goal, in the order they are tried.
pub(super) type Alternatives = Box<dyn Iterator<Item = Branch>>;

/// A substitution together with everything still to be proved under it.
pub(super) struct Branch {
    pub(super) subst: Bindings,
    pub(super) cont: Cont,
}

impl Branch {
    pub(super) fn new(subst: Bindings, cont: Cont) -> Self {
        Branch { subst, cont }
    }
}

/// The rest of a proof. `Cont::done()` means the branch is an answer.
#[derive(Clone)]
pub(super) struct Cont(Option<Arc<Frame>>);

pub(super) struct Frame {
    kind: FrameKind,
    next: Cont,
}

pub(super) enum FrameKind {
    /// Prove `goals[index..]`; rules met here expand at `depth`.
    Goals {
        goals: Arc<[Goal]>,
        index: usize,
        depth: usize,
    },
    /// Resolve `statements[index..]` as queries, in order.
    Statements {
        statements: Arc<[Statement]>,
        index: usize,
    },
    /// A rule body finished: carry its values for `to_prove` back into
    /// `caller`.
    Project { caller: Bindings, to_prove: Vec<Var> },
}

impl Cont {
    pub(super) fn done() -> Self {
        Cont(None)
    }

    pub(super) fn push(kind: FrameKind, next: Cont) -> Self {
        Cont(Some(Arc::new(Frame { kind, next })))
    }

    pub(super) fn goals(goals: Arc<[Goal]>, depth: usize, next: Cont) -> Self {
        Cont::push(
            FrameKind::Goals {
                goals,
                index: 0,
                depth,
            },
            next,
        )
    }
}

impl Drop for Cont {
    // Unlink uniquely owned frames one at a time; a recursive drop of a long
    // chain would exhaust the stack.
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(frame) = next {
            match Arc::try_unwrap(frame) {
                Ok(mut frame) => next = frame.next.0.take(),
                Err(_) => break,
            }
        }
    }
}

/// Depth-first search over branches.
pub(super) struct Machine {
    resolver: Resolver,
    start: Option<Branch>,
    choices: Vec<Alternatives>,
}

impl Machine {
    pub(super) fn new(resolver: Resolver, start: Branch) -> Self {
        Machine {
            resolver,
            start: Some(start),
            choices: Vec::new(),
        }
    }

    /// Step `branch` until it is an answer, dies, or reaches a goal with
    /// alternatives (pushed onto the choice stack).
    fn run(&mut self, mut branch: Branch) -> Option<Bindings> {
        loop {
            let frame = match &branch.cont.0 {
                None => return Some(branch.subst),
                Some(frame) => Arc::clone(frame),
            };
            match &frame.kind {
                FrameKind::Goals {
                    goals,
                    index,
                    depth,
                } => {
                    let Some(goal) = goals.get(*index) else {
                        branch.cont = frame.next.clone();
                        continue;
                    };
                    let rest = if index + 1 < goals.len() {
                        Cont::push(
                            FrameKind::Goals {
                                goals: Arc::clone(goals),
                                index: index + 1,
                                depth: *depth,
                            },
                            frame.next.clone(),
                        )
                    } else {
                        frame.next.clone()
                    };
                    let alternatives = self.resolver.alternatives(goal, branch.subst, rest, *depth);
                    self.choices.push(alternatives);
                    return None;
                }
                FrameKind::Statements { statements, index } => match statements.get(*index) {
                    None => branch.cont = frame.next.clone(),
                    Some(Statement::Query(query)) => {
                        let rest = Cont::push(
                            FrameKind::Statements {
                                statements: Arc::clone(statements),
                                index: index + 1,
                            },
                            frame.next.clone(),
                        );
                        branch.cont = Cont::goals(query.goals.clone().into(), 0, rest);
                    }
                    Some(other) => {
                        warn!("cannot resolve {} as a goal", other);
                        return None;
                    }
                },
                FrameKind::Project { caller, to_prove } => {
                    branch.subst = project(caller, to_prove, &branch.subst)?;
                    branch.cont = frame.next.clone();
                }
            }
        }
    }
}

impl Iterator for Machine {
    type Item = Bindings;

    fn next(&mut self) -> Option<Bindings> {
        loop {
            let branch = match self.start.take() {
                Some(branch) => branch,
                None => {
                    let top = self.choices.last_mut()?;
                    match top.next() {
                        Some(branch) => branch,
                        None => {
                            self.choices.pop();
                            continue;
                        }
                    }
                }
            };
            if let Some(answer) = self.run(branch) {
                return Some(answer);
            }
        }
    }
}

/// Bind each of `to_prove` that `discovered` gives a non-variable value in a
/// copy of `caller`. `None` if a value conflicts with the caller's.
fn project(caller: &Bindings, to_prove: &[Var], discovered: &Bindings) -> Option<Bindings> {
    let mut out = caller.clone();
    for var in to_prove {
        let value = discovered.ground(&Term::Var(var.clone()));
        if !value.is_var() && !out.bind(var, value) {
            return None;
        }
    }
    Some(out)
}
