//! Per-application mutual exclusion.
//!
//! At most one create or delete may run for a given application name within
//! a process. A second request is rejected rather than queued.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::ApplicationError;

/// Registry of application names with an operation in flight.
#[derive(Debug, Default)]
pub struct NameLocks {
    held: Mutex<HashSet<String>>,
}

/// Releases the name when dropped.
#[derive(Debug)]
pub struct NameGuard<'a> {
    locks: &'a NameLocks,
    name: String,
}

impl NameLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for the lifetime of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::OperationInProgress` if the name is held.
    pub fn try_acquire(&self, name: &str) -> Result<NameGuard<'_>, ApplicationError> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if !held.insert(name.to_string()) {
            return Err(ApplicationError::OperationInProgress(name.to_string()));
        }
        Ok(NameGuard {
            locks: self,
            name: name.to_string(),
        })
    }

    /// Returns `true` if an operation on `name` is in flight.
    #[must_use]
    pub fn is_held(&self, name: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }
}

impl Drop for NameGuard<'_> {
    fn drop(&mut self) {
        self.locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.name);
    }
}
