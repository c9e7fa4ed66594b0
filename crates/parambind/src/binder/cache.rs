use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Per-instance mirror of deserialized values, keyed by attribute index.
///
/// Only ever holds values of cache-eligible attributes, normalized so a hit
/// returns exactly what a fresh read would.
#[derive(Debug, Default)]
pub(crate) struct ValueCache {
    entries: RefCell<HashMap<usize, Value>>,
}

impl ValueCache {
    pub(crate) fn get(&self, index: usize) -> Option<Value> {
        self.entries.borrow().get(&index).cloned()
    }

    pub(crate) fn put(&self, index: usize, value: Value) {
        self.entries.borrow_mut().insert(index, value);
    }

    /// Returns whether an entry was dropped.
    pub(crate) fn evict(&self, index: usize) -> bool {
        self.entries.borrow_mut().remove(&index).is_some()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
