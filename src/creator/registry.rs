// src/creator/registry.rs

//! Write-once store for phase outcomes
//!
//! Outcomes are keyed by their Rust type. Each type can be pushed exactly
//! once per build invocation; pushing it again is an error even when the
//! value is identical.

use crate::error::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

struct StoredOutcome {
    type_name: &'static str,
    value: Box<dyn Any>,
}

/// Typed outcomes produced by build phases
#[derive(Default)]
pub struct PhaseOutcomeRegistry {
    outcomes: HashMap<TypeId, StoredOutcome>,
}

impl PhaseOutcomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of type `T`
    ///
    /// Fails with `DuplicateOutcome` if an outcome of this type exists.
    pub fn push<T: Any>(&mut self, outcome: T) -> Result<()> {
        let id = TypeId::of::<T>();
        if self.outcomes.contains_key(&id) {
            return Err(Error::DuplicateOutcome(type_name::<T>()));
        }
        self.outcomes.insert(
            id,
            StoredOutcome {
                type_name: type_name::<T>(),
                value: Box::new(outcome),
            },
        );
        Ok(())
    }

    /// Borrow the outcome of type `T`
    ///
    /// Fails with `MissingOutcome` if no phase pushed one.
    pub fn get<T: Any>(&self) -> Result<&T> {
        self.outcomes
            .get(&TypeId::of::<T>())
            .and_then(|stored| stored.value.downcast_ref::<T>())
            .ok_or(Error::MissingOutcome(type_name::<T>()))
    }

    /// Check for an outcome of type `T`
    pub fn has<T: Any>(&self) -> bool {
        self.outcomes.contains_key(&TypeId::of::<T>())
    }

    /// Remove and return the outcome of type `T`
    pub fn take<T: Any>(&mut self) -> Result<T> {
        let stored = self
            .outcomes
            .remove(&TypeId::of::<T>())
            .ok_or(Error::MissingOutcome(type_name::<T>()))?;
        stored
            .value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::MissingOutcome(type_name::<T>()))
    }

    /// Type names of stored outcomes, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.outcomes.values().map(|s| s.type_name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl std::fmt::Debug for PhaseOutcomeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseOutcomeRegistry")
            .field("outcomes", &self.type_names())
            .finish()
    }
}
