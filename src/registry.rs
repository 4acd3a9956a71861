//! Macro registry: caller-extensible, dialect-scoped SQL fragment
//! generators.
//!
//! The registry is the only shared mutable state in the engine.
//! Registration swaps in a new table under a write lock, while a render
//! clones the current `Arc` once and evaluates its whole pass against
//! that snapshot, so concurrent registration never tears a render.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::dialect::Dialect;
use crate::error::WeaveResult;
use crate::value::Value;

/// A dialect-scoped macro: pure function from arguments to a SQL
/// fragment.
pub type MacroFn = Arc<dyn Fn(&Dialect, &[Value]) -> WeaveResult<String> + Send + Sync>;

/// Table of `(dialect_name, macro_name) -> MacroFn`.
///
/// Registration is last-write-wins for an exact `(dialect, name)` pair.
/// This is intentionally more permissive than reject-duplicate
/// registries: tests and provider overrides rely on re-registering a
/// name to shadow the shipped default under one dialect.
#[derive(Default)]
pub struct MacroRegistry {
    entries: RwLock<Arc<HashMap<(String, String), MacroFn>>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `f` at `(dialect, name)`, overwriting any prior entry
    /// for that exact pair.
    pub fn register_macro<F>(&self, dialect: impl Into<String>, name: impl Into<String>, f: F)
    where
        F: Fn(&Dialect, &[Value]) -> WeaveResult<String> + Send + Sync + 'static,
    {
        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next: HashMap<(String, String), MacroFn> = guard.as_ref().clone();
        next.insert((dialect.into(), name.into()), Arc::new(f));
        *guard = Arc::new(next);
    }

    /// One consistent view of the registry for the duration of a render.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let guard = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        RegistrySnapshot {
            entries: Arc::clone(&guard),
        }
    }
}

/// Immutable view of the registry taken at the start of a render.
#[derive(Clone)]
pub struct RegistrySnapshot {
    entries: Arc<HashMap<(String, String), MacroFn>>,
}

impl RegistrySnapshot {
    /// Exact `(dialect, name)` lookup; default-pack fallback is the
    /// evaluator's concern.
    pub fn get(&self, dialect: &str, name: &str) -> Option<MacroFn> {
        self.entries
            .get(&(dialect.to_string(), name.to_string()))
            .cloned()
    }
}
