//! Scoped environment for the evaluator.

use crate::value::Value;
use std::collections::BTreeMap;

/// A single scope level.
#[derive(Debug, Clone, Default)]
struct Scope {
    bindings: BTreeMap<String, Value>,
    /// Consent decisions recorded while this scope was innermost.
    consents: BTreeMap<String, bool>,
}

/// Stack of scopes. The parent of a scope is the slot below it.
///
/// Lookups (variables and consent) search innermost to outermost.
/// `define` and `record_consent` always write to the innermost scope, so a
/// child's entries vanish when it is popped. `set` rebinds wherever the
/// name currently lives.
///
/// The gratitude log belongs to the environment as a whole.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
    gratitude: Vec<(String, String)>,
}

impl Environment {
    /// Create an environment with one global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            gratitude: Vec::new(),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of live scopes, including the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `name` in the innermost scope, replacing any binding it had there.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
    }

    /// Rebind `name` in the innermost scope that holds it.
    /// Returns `false` when no scope does.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The nearest recorded decision for `permission`, if any.
    pub fn consent(&self, permission: &str) -> Option<bool> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.consents.get(permission).copied())
    }

    pub fn record_consent(&mut self, permission: &str, granted: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.consents.insert(permission.to_string(), granted);
        }
    }

    pub fn record_gratitude(&mut self, contributor: &str, contribution: &str) {
        self.gratitude
            .push((contributor.to_string(), contribution.to_string()));
    }

    /// Every gratitude entry in the order it was recorded.
    pub fn gratitude(&self) -> &[(String, String)] {
        &self.gratitude
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
