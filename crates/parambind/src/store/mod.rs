//! # Parameter Store
//!
//! The binding layer sits on top of an external, flat, string-keyed and
//! string-valued store that announces every change. [`ParameterStore`] is the
//! only surface serializers talk to; nothing else about the store (persistence,
//! construction, teardown) is this crate's concern.
//!
//! ## Contract
//!
//! - All methods take `&self`. Implementations use interior mutability; access
//!   is single-threaded and synchronous.
//! - Observers fire synchronously, inside the `set_entry`/`remove_entry` call
//!   that caused them, once per call.
//! - An observer may call back into the store. Implementations must not hold
//!   internal borrows while dispatching.
//!
//! ## Implementations
//!
//! - [`memory::MemoryStore`]: in-memory store used by tests, and as the scratch
//!   buffer list serializers encode elements through.

use crate::error::Result;
use std::collections::BTreeSet;
use std::rc::Rc;

pub mod memory;

pub use memory::MemoryStore;

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEventKind {
    Set,
    Removed,
}

/// A single change notification from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
    pub kind: StoreEventKind,
}

/// Handle returned by [`ParameterStore::add_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverToken(pub u64);

pub type StoreObserver = Rc<dyn Fn(&StoreEvent)>;

/// Abstract interface to the underlying key/value store.
pub trait ParameterStore {
    fn has_entry(&self, key: &str) -> bool;

    /// Raw value for `key`, or `None` when absent.
    fn get_entry(&self, key: &str) -> Option<String>;

    fn set_entry(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_entry(&self, key: &str) -> Result<()>;

    fn list_entries(&self) -> BTreeSet<String>;

    fn add_observer(&self, observer: StoreObserver) -> ObserverToken;

    fn remove_observer(&self, token: ObserverToken);
}
