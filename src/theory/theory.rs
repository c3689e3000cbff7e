//! Theory: the signature-indexed store of facts and rules.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::syntax::{Signature, Statement};

/// Prefix of variables renamed on insertion.
pub const STORE_VAR_PREFIX: &str = "_h";

/// Storage interface consulted by the resolver.
///
/// Implementations must return statements for a signature in insertion order,
/// as a snapshot: inserting while a lookup result is being consumed does not
/// affect that result.
pub trait Indexer {
    /// Store a fact or rule after renaming its variables apart. Queries are
    /// ignored.
    fn index_statement(&self, statement: Statement);

    fn statements_for_signature(&self, signature: &Signature) -> Vec<Statement>;
}

#[derive(Debug, Default)]
struct Store {
    by_signature: HashMap<String, Vec<Statement>>,
    next_var: usize,
    count: usize,
}

/// A set of facts and rules keyed by `functor/arity`.
#[derive(Debug, Default)]
pub struct Theory {
    store: RwLock<Store>,
}

impl Theory {
    pub fn new() -> Self {
        Theory::default()
    }

    /// Create a theory from parsed statements. Queries among them are skipped.
    pub fn from_statements<I>(statements: I) -> Self
    where
        I: IntoIterator<Item = Statement>,
    {
        let theory = Theory::new();
        for statement in statements {
            theory.index_statement(statement);
        }
        theory
    }

    /// Number of stored facts and rules.
    pub fn len(&self) -> usize {
        self.store.read().unwrap_or_else(PoisonError::into_inner).count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signatures with at least one stored statement, sorted.
    pub fn signatures(&self) -> Vec<Signature> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let mut sigs: Vec<Signature> = store
            .by_signature
            .values()
            .filter_map(|stmts| stmts.first().and_then(Statement::signature))
            .collect();
        sigs.sort();
        sigs
    }

    /// All stored statements, grouped by signature in sorted order.
    pub fn statements(&self) -> Vec<Statement> {
        self.signatures()
            .iter()
            .flat_map(|sig| self.statements_for_signature(sig))
            .collect()
    }
}

impl Indexer for Theory {
    fn index_statement(&self, statement: Statement) {
        let Some(signature) = statement.signature() else {
            debug!("ignoring query passed to the store: {}", statement);
            return;
        };
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let (renamed, _, used) = statement.anonymize(store.next_var, STORE_VAR_PREFIX);
        store.next_var += used;
        store.count += 1;
        debug!("indexed {} under {}", renamed, signature);
        store
            .by_signature
            .entry(signature.key())
            .or_default()
            .push(renamed);
    }

    fn statements_for_signature(&self, signature: &Signature) -> Vec<Statement> {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store
            .by_signature
            .get(&signature.key())
            .cloned()
            .unwrap_or_default()
    }
}
