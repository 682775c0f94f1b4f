use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Program name to invocation path, filled lazily and never evicted.
///
/// The lock is only held for a single lookup or insert, so two callers
/// resolving the same uncached name may both do the work. Resolution is
/// deterministic, so the second insert writes the same value.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, program: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(program)
            .cloned()
    }

    pub fn insert(&self, program: &str, path: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(program.to_string(), path.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
