//! Consistent variable renaming (anonymization).

use std::collections::HashMap;

use super::Var;

/// Allocates fresh names `<prefix><n>` starting from a given counter value.
///
/// The same source variable always maps to the same fresh name within one
/// `Renaming`, so a clause renamed through a single instance keeps its
/// variable sharing intact.
#[derive(Debug, Clone)]
pub struct Renaming {
    prefix: String,
    start: usize,
    mapping: HashMap<String, String>,
}

impl Renaming {
    pub fn new(prefix: impl Into<String>, start: usize) -> Self {
        Renaming {
            prefix: prefix.into(),
            start,
            mapping: HashMap::new(),
        }
    }

    pub fn rename(&mut self, var: &Var) -> Var {
        if let Some(name) = self.mapping.get(var.name()) {
            return Var::new(name.clone());
        }
        let fresh = format!("{}{}", self.prefix, self.start + self.mapping.len());
        self.mapping.insert(var.name().to_string(), fresh.clone());
        Var::new(fresh)
    }

    /// Number of fresh names handed out so far.
    pub fn used(&self) -> usize {
        self.mapping.len()
    }

    pub fn into_mapping(self) -> HashMap<String, String> {
        self.mapping
    }
}
