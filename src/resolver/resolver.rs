//! Depth-first SLD resolution over lazy solution streams.
//!
//! Search state lives on the heap (see `machine`), so proofs of any depth run
//! in constant native stack.

use std::io::{self, Write};
use std::iter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use super::builtins::{default_builtins, Builtin};
use super::machine::{Alternatives, Branch, Cont, FrameKind, Machine};
use super::math::evaluate;
use super::stream::{FailureSlot, QueryStream, ResolveError};
use crate::syntax::{Fact, Goal, MathAssignment, Query, Rule, Statement, Term};
use crate::theory::Indexer;
use crate::unify::{unify_facts, Bindings};

/// Prefix of variables introduced when a stored clause is used.
pub const FRESH_VAR_PREFIX: &str = "_sf";

/// A lazy stream of solutions.
pub type Solutions = Box<dyn Iterator<Item = Bindings>>;

type Output = Arc<Mutex<Box<dyn Write + Send>>>;

/// Configuration for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum nesting of rule expansions (None for unlimited). Rules that
    /// would exceed it are skipped.
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig { max_depth: None }
    }
}

struct Inner {
    theory: Arc<dyn Indexer + Send + Sync>,
    builtins: Arc<Vec<Box<dyn Builtin + Send + Sync>>>,
    next_var: AtomicUsize,
    config: ResolverConfig,
    output: Output,
}

/// Answers goals against a knowledge base.
///
/// A `Resolver` is a cheap handle: cloning it shares the knowledge base, the
/// builtins, the output sink and the fresh-variable counter. Solution streams
/// hold their own clone, so they outlive the borrow that created them.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<Inner>,
    failure: FailureSlot,
}

impl Resolver {
    /// A resolver with the default builtins, writing to stdout.
    pub fn new(theory: Arc<dyn Indexer + Send + Sync>) -> Self {
        Resolver::with_output(theory, ResolverConfig::default(), Box::new(io::stdout()))
    }

    pub fn with_config(theory: Arc<dyn Indexer + Send + Sync>, config: ResolverConfig) -> Self {
        Resolver::with_output(theory, config, Box::new(io::stdout()))
    }

    /// A resolver whose `writeln/1` output goes to `output`.
    pub fn with_output(
        theory: Arc<dyn Indexer + Send + Sync>,
        config: ResolverConfig,
        output: Box<dyn Write + Send>,
    ) -> Self {
        Resolver {
            inner: Arc::new(Inner {
                theory,
                builtins: Arc::new(default_builtins()),
                next_var: AtomicUsize::new(0),
                config,
                output: Arc::new(Mutex::new(output)),
            }),
            failure: FailureSlot::default(),
        }
    }

    /// A resolver sharing this one's knowledge base, builtins and output but
    /// using `config`. Streams already created keep the old configuration.
    pub fn reconfigured(&self, config: ResolverConfig) -> Self {
        Resolver {
            inner: Arc::new(Inner {
                theory: Arc::clone(&self.inner.theory),
                builtins: Arc::clone(&self.inner.builtins),
                next_var: AtomicUsize::new(self.inner.next_var.load(Ordering::Relaxed)),
                config,
                output: Arc::clone(&self.inner.output),
            }),
            failure: FailureSlot::default(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.inner.config
    }

    pub fn theory(&self) -> &Arc<dyn Indexer + Send + Sync> {
        &self.inner.theory
    }

    /// Resolve `query` from an empty substitution.
    ///
    /// Errors raised by builtins during resolution end the returned stream.
    pub fn query(&self, query: &Query) -> QueryStream {
        let resolver = Resolver {
            inner: Arc::clone(&self.inner),
            failure: FailureSlot::default(),
        };
        let failure = Arc::clone(&resolver.failure);
        debug!("resolving {}", query);
        QueryStream::new(resolver.resolve_query(query, Bindings::new()), failure)
    }

    /// Resolve each statement in order, threading every solution of one
    /// statement into the next. Only queries can be resolved; a fact or rule
    /// in the list ends every branch that reaches it.
    pub fn resolve_statement_list(&self, statements: Vec<Statement>, subst: Bindings) -> Solutions {
        let cont = Cont::push(
            FrameKind::Statements {
                statements: statements.into(),
                index: 0,
            },
            Cont::done(),
        );
        self.search(Branch::new(subst, cont))
    }

    pub fn resolve_query(&self, query: &Query, subst: Bindings) -> Solutions {
        let cont = Cont::goals(query.goals.clone().into(), 0, Cont::done());
        self.search(Branch::new(subst, cont))
    }

    pub fn resolve_fact(&self, goal: &Fact, subst: &Bindings) -> Solutions {
        let cont = Cont::goals(Arc::from(vec![Goal::Fact(goal.clone())]), 0, Cont::done());
        self.search(Branch::new(subst.clone(), cont))
    }

    /// `X is Expr`: binds `X` to the value of `Expr`. Yields nothing if `X`
    /// already has a value or the expression cannot be evaluated.
    pub fn resolve_math_assignment(&self, ma: &MathAssignment, subst: &Bindings) -> Solutions {
        let current = subst.dereference(&Term::Var(ma.lhs.clone()));
        if !current.is_var() {
            debug!("{} is already bound to {}", ma.lhs, current);
            return Box::new(iter::empty());
        }
        match evaluate(&ma.rhs, subst) {
            Ok(value) => {
                let mut out = subst.clone();
                if out.bind(&ma.lhs, Term::Number(value)) {
                    Box::new(iter::once(out))
                } else {
                    Box::new(iter::empty())
                }
            }
            Err(err) => {
                debug!("cannot evaluate {}: {}", ma, err);
                Box::new(iter::empty())
            }
        }
    }

    fn search(&self, start: Branch) -> Solutions {
        Box::new(Machine::new(self.clone(), start))
    }

    /// The ways `goal` can be proved under `subst`, each continuing with
    /// `rest`: builtins first, then stored facts and rules in store order.
    pub(super) fn alternatives(
        &self,
        goal: &Goal,
        subst: Bindings,
        rest: Cont,
        depth: usize,
    ) -> Alternatives {
        let goal = match goal {
            Goal::Math(ma) => {
                return Box::new(
                    self.resolve_math_assignment(ma, &subst)
                        .map(move |b| Branch::new(b, rest.clone())),
                )
            }
            Goal::Fact(fact) => fact,
        };
        trace!("goal {} at depth {}", subst.ground_fact(goal), depth);
        for builtin in self.inner.builtins.iter() {
            if let Some(solutions) = builtin.resolve(self, goal, &subst) {
                return Box::new(solutions.map(move |b| Branch::new(b, rest.clone())));
            }
        }

        let candidates = self.inner.theory.statements_for_signature(&goal.signature());
        let resolver = self.clone();
        let goal = goal.clone();
        Box::new(candidates.into_iter().filter_map(move |candidate| match candidate {
            Statement::Fact(stored) => resolver
                .resolve_against_fact(&stored, &goal, &subst)
                .map(|b| Branch::new(b, rest.clone())),
            Statement::Rule(rule) => resolver.resolve_against_rule(&rule, &goal, &subst, &rest, depth),
            Statement::Query(_) => None,
        }))
    }

    fn resolve_against_fact(&self, stored: &Fact, goal: &Fact, subst: &Bindings) -> Option<Bindings> {
        let stored = if stored.is_ground() {
            stored.clone()
        } else {
            match self.rename_apart(&Statement::Fact(stored.clone())) {
                Statement::Fact(fact) => fact,
                _ => return None,
            }
        };
        unify_facts(&stored, goal, subst)
    }

    /// Start a proof of `rule`'s body for `goal`. The body runs on its own
    /// substitution; its values for the goal's variables are projected back
    /// into `subst` when it completes.
    fn resolve_against_rule(
        &self,
        rule: &Rule,
        goal: &Fact,
        subst: &Bindings,
        rest: &Cont,
        depth: usize,
    ) -> Option<Branch> {
        if let Some(max) = self.inner.config.max_depth {
            if depth >= max {
                warn!("depth limit {} reached, skipping {}", max, rule);
                return None;
            }
        }

        let rule = match self.rename_apart(&Statement::Rule(rule.clone())) {
            Statement::Rule(rule) => rule,
            _ => return None,
        };
        let grounded = subst.ground_fact(goal);
        let initial = unify_facts(&rule.head, &grounded, &Bindings::new())?;
        trace!("expanding {} for {}", rule, grounded);

        let project = Cont::push(
            FrameKind::Project {
                caller: subst.clone(),
                to_prove: grounded.variables(),
            },
            rest.clone(),
        );
        let body = Cont::goals(rule.body.goals.into(), depth + 1, project);
        Some(Branch::new(initial, body))
    }

    /// Rename every variable of `statement` to a fresh `_sf<n>` name.
    fn rename_apart(&self, statement: &Statement) -> Statement {
        let count = statement.variables().len();
        let start = self.inner.next_var.fetch_add(count, Ordering::Relaxed);
        let (renamed, _, _) = statement.anonymize(start, FRESH_VAR_PREFIX);
        renamed
    }

    pub(crate) fn write_line(&self, text: &str) -> io::Result<()> {
        let mut out = self
            .inner
            .output
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", text)?;
        out.flush()
    }

    /// Record `err` for the current top-level query. Only the first error is kept.
    pub(crate) fn report(&self, err: ResolveError) {
        warn!("{}", err);
        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}
