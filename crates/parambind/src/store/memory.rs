use super::{ObserverToken, ParameterStore, StoreEvent, StoreEventKind, StoreObserver};
use crate::error::{ParamError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

/// In-memory parameter store.
///
/// Uses `RefCell` for interior mutability since access is single-threaded.
/// Observers are dispatched after every internal borrow is released, so they
/// may freely read or write the store.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    observers: RefCell<Vec<(ObserverToken, StoreObserver)>>,
    next_token: Cell<u64>,
    simulate_write_error: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    fn notify(&self, key: &str, kind: StoreEventKind) {
        let observers: Vec<StoreObserver> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        let event = StoreEvent {
            key: key.to_string(),
            kind,
        };
        for observer in observers {
            observer(&event);
        }
    }
}

impl ParameterStore for MemoryStore {
    fn has_entry(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn get_entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_entry(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(ParamError::Store("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.notify(key, StoreEventKind::Set);
        Ok(())
    }

    fn remove_entry(&self, key: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(ParamError::Store("Simulated write error".to_string()));
        }
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.notify(key, StoreEventKind::Removed);
        }
        Ok(())
    }

    fn list_entries(&self) -> BTreeSet<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    fn add_observer(&self, observer: StoreObserver) -> ObserverToken {
        let token = ObserverToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.observers.borrow_mut().push((token, observer));
        token
    }

    fn remove_observer(&self, token: ObserverToken) {
        self.observers.borrow_mut().retain(|(t, _)| *t != token);
    }
}
