//! Bound instances: a resolved [`Schema`] attached to one `(store, prefix)` pair.
//!
//! ## Reads and Writes
//!
//! - **Read**: cache hit returns the cached value. On a miss the serializer
//!   reads the store; an absent entry materializes the default into the store
//!   first. Cache-eligible values are then cached.
//! - **Write**: the serializer validates, then writes. A rejected value never
//!   reaches the store. The normalized value is cached.
//!
//! ## Store Observation
//!
//! Each instance observes its store. An event on one of its keys evicts that
//! attribute's cache entry, so external writes and writes from another instance
//! with the same prefix are seen on the next read. The event is then forwarded
//! to the instance's subscribers as a [`ChangeEvent`], one per store write.
//! Default materialization is not forwarded, neither by the instance that
//! materializes nor by peers bound to the same store.
//!
//! The store observer holds only a weak reference; dropping the last handle to
//! an instance (including any [`ListProxy`] over it) unregisters it.

use super::cache::ValueCache;
use super::{ResolvedAttribute, Schema};
use crate::error::{ParamError, Result};
use crate::proxy::ListProxy;
use crate::store::{ObserverToken, ParameterStore, StoreEvent, StoreEventKind};
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Notification that one attribute of a bound instance changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub name: String,
    pub key: String,
    pub kind: StoreEventKind,
}

/// Handle returned by [`BoundInstance::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type Subscriber = Rc<dyn Fn(&ChangeEvent)>;

thread_local! {
    /// `(store, key)` pairs whose default is being written. Shared by every
    /// instance on the thread so peers over the same store stay silent too.
    static MATERIALIZING: RefCell<HashSet<(usize, String)>> = RefCell::new(HashSet::new());
}

fn store_id(store: &Rc<dyn ParameterStore>) -> usize {
    Rc::as_ptr(store) as *const () as usize
}

/// Typed, namespaced view over a store. Cloning yields another handle to the
/// same instance (shared cache and subscribers).
#[derive(Clone)]
pub struct BoundInstance {
    inner: Rc<InstanceInner>,
}

pub(crate) struct InstanceInner {
    schema: Schema,
    store: Rc<dyn ParameterStore>,
    prefix: String,
    keys: Vec<String>,
    by_key: HashMap<String, usize>,
    cache: ValueCache,
    subscribers: RefCell<Vec<(SubscriptionToken, Subscriber)>>,
    next_subscription: Cell<u64>,
    observer: Cell<Option<ObserverToken>>,
}

impl BoundInstance {
    pub(crate) fn new(schema: Schema, store: Rc<dyn ParameterStore>, prefix: String) -> Self {
        let keys: Vec<String> = schema
            .attributes()
            .iter()
            .map(|a| schema.config().key_for(&prefix, &a.name))
            .collect();
        let by_key = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key.clone(), index))
            .collect();

        let inner = Rc::new(InstanceInner {
            schema,
            store,
            prefix,
            keys,
            by_key,
            cache: ValueCache::default(),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            observer: Cell::new(None),
        });

        let weak: Weak<InstanceInner> = Rc::downgrade(&inner);
        let token = inner.store.add_observer(Rc::new(move |event: &StoreEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_store_event(event);
            }
        }));
        inner.observer.set(Some(token));

        Self { inner }
    }

    /// Current value of `name`, detached from the store.
    pub fn get(&self, name: &str) -> Result<Value> {
        let index = self.inner.schema.index_of(name)?;
        self.inner.read(index)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.inner.schema.index_of(name)?;
        self.inner.write(index, value.into())
    }

    /// Live proxy over a list attribute.
    pub fn list(&self, name: &str) -> Result<ListProxy> {
        let index = self.inner.schema.index_of(name)?;
        let serializer = self.inner.attribute(index).serializer.clone();
        if serializer.element().is_none() {
            return Err(ParamError::Unsupported(format!(
                "'{}' is not a list attribute",
                name
            )));
        }
        Ok(ListProxy::new(self.inner.clone(), index, serializer))
    }

    /// Erase the attribute from the store. Removing an absent entry is a no-op.
    pub fn remove(&self, name: &str) -> Result<()> {
        let index = self.inner.schema.index_of(name)?;
        let attribute = self.inner.attribute(index);
        attribute
            .serializer
            .remove(&*self.inner.store, &self.inner.keys[index])?;
        self.inner.cache.evict(index);
        Ok(())
    }

    /// Whether the store holds an entry for `name`.
    pub fn has_value(&self, name: &str) -> Result<bool> {
        let index = self.inner.schema.index_of(name)?;
        Ok(self
            .inner
            .attribute(index)
            .serializer
            .is_in(&*self.inner.store, &self.inner.keys[index]))
    }

    /// Static cache eligibility of `name`.
    pub fn is_cached(&self, name: &str) -> Result<bool> {
        let index = self.inner.schema.index_of(name)?;
        Ok(self.inner.attribute(index).cacheable)
    }

    /// Store key backing `name`.
    pub fn key_for(&self, name: &str) -> Result<&str> {
        let index = self.inner.schema.index_of(name)?;
        Ok(&self.inner.keys[index])
    }

    /// Declared attribute names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.schema.attributes().iter().map(|a| a.name.as_str())
    }

    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn store(&self) -> &Rc<dyn ParameterStore> {
        &self.inner.store
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionToken
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        let token = SubscriptionToken(self.inner.next_subscription.get());
        self.inner.next_subscription.set(token.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((token, Rc::new(callback)));
        token
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(t, _)| *t != token);
        before != subscribers.len()
    }
}

impl fmt::Debug for BoundInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundInstance")
            .field("prefix", &self.inner.prefix)
            .field("keys", &self.inner.keys)
            .finish()
    }
}

impl InstanceInner {
    pub(crate) fn attribute(&self, index: usize) -> &ResolvedAttribute {
        &self.schema.attributes()[index]
    }

    pub(crate) fn key(&self, index: usize) -> &str {
        &self.keys[index]
    }

    fn caches(&self, index: usize) -> bool {
        self.schema.config().caching && self.attribute(index).cacheable
    }

    pub(crate) fn read(&self, index: usize) -> Result<Value> {
        let key = self.key(index);
        if self.caches(index) {
            if let Some(value) = self.cache.get(index) {
                trace!(key, "cache hit");
                return Ok(value);
            }
            trace!(key, "cache miss");
        }

        let serializer = &self.attribute(index).serializer;
        let value = if serializer.is_in(&*self.store, key) {
            serializer.read(&*self.store, key)?
        } else {
            self.materialize_default(index)?
        };

        if self.caches(index) {
            self.cache.put(index, value.clone());
        }
        Ok(value)
    }

    pub(crate) fn write(&self, index: usize, value: Value) -> Result<()> {
        let key = self.key(index);
        let serializer = &self.attribute(index).serializer;
        serializer
            .write(&*self.store, key, &value)
            .inspect_err(|e| {
                if let ParamError::InvalidValue(reason) = e {
                    debug!(key, %reason, "rejected write");
                }
            })?;
        if self.caches(index) {
            self.cache.put(index, serializer.normalize(value));
        }
        Ok(())
    }

    fn materialize_default(&self, index: usize) -> Result<Value> {
        let key = self.key(index);
        let serializer = &self.attribute(index).serializer;
        let default = serializer.default_value();
        debug!(key, value = ?default, "materializing default");

        let pending = (store_id(&self.store), key.to_string());
        MATERIALIZING.with(|keys| keys.borrow_mut().insert(pending.clone()));
        let written = serializer.write_unvalidated(&*self.store, key, &default);
        MATERIALIZING.with(|keys| keys.borrow_mut().remove(&pending));
        written?;

        Ok(serializer.normalize(default))
    }

    fn on_store_event(&self, event: &StoreEvent) {
        let Some(&index) = self.by_key.get(&event.key) else {
            return;
        };
        if self.cache.evict(index) {
            trace!(key = %event.key, "cache invalidated");
        }
        let materializing = MATERIALIZING.with(|keys| {
            keys.borrow()
                .contains(&(store_id(&self.store), event.key.clone()))
        });
        if materializing {
            return;
        }

        let change = ChangeEvent {
            name: self.attribute(index).name.clone(),
            key: event.key.clone(),
            kind: event.kind,
        };
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&change);
        }
    }
}

impl Drop for InstanceInner {
    fn drop(&mut self) {
        if let Some(token) = self.observer.take() {
            self.store.remove_observer(token);
        }
    }
}
