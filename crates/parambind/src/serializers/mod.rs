//! # Serializers
//!
//! A serializer owns the encoding of one declared type into the string-valued
//! store: how to write it, read it back, detect it, remove it, and what value to
//! use when nothing is stored yet.
//!
//! ## Capability Set
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`Serializer::default_value`] | Value used when the store has no entry |
//! | [`Serializer::is_in`] | Whether the store holds an entry for the key |
//! | [`Serializer::write`] / [`Serializer::read`] | Encode / decode through the store |
//! | [`Serializer::write_unvalidated`] | Encode a default, bypassing validators |
//! | [`Serializer::remove`] | Erase every trace of the key |
//! | [`Serializer::validate`] | Reject a candidate value before any store mutation |
//! | [`Serializer::normalize`] | The exact value a fresh read would produce |
//! | [`Serializer::is_cacheable`] | Static cache eligibility |
//!
//! `can_serialize`/`create` live on [`SerializerFactory`], which the registry
//! consults when resolving a declared type.
//!
//! ## Built-ins
//!
//! - [`NumberSerializer`], [`BoolSerializer`], [`StringSerializer`], [`PathSerializer`]
//! - [`ObjectSerializer`]: handles into the host model
//! - [`ListSerializer`]: homogeneous lists, recursively
//! - [`OptionalSerializer`]: a value or the absence marker
//! - [`JsonSerializer`]: any serde type, registered as a custom type
//! - [`ValidatedSerializer`]: wraps any of the above with validators and an explicit default
//!
//! Built-in factories return a `ValidatedSerializer` carrying `NotNone` and an
//! `IsInstance` check, the same shape user factories are expected to produce.

use crate::error::Result;
use crate::store::ParameterStore;
use crate::types::TypeDesc;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

mod custom;
mod list;
mod object;
mod optional;
mod primitive;
mod validated;

pub(crate) use custom::JsonFactory;
pub use custom::JsonSerializer;
pub use list::ListSerializer;
pub use object::ObjectSerializer;
pub use optional::OptionalSerializer;
pub use primitive::{BoolSerializer, NumberSerializer, PathSerializer, StringSerializer};
pub use validated::ValidatedSerializer;

pub type SerializerRef = Rc<dyn Serializer>;

/// Type-specific encoding against a [`ParameterStore`].
pub trait Serializer: fmt::Debug {
    fn default_value(&self) -> Value;

    fn is_in(&self, store: &dyn ParameterStore, key: &str) -> bool {
        store.has_entry(key)
    }

    /// Encode `value` under `key`. Callers validate first; implementations
    /// must not leave a partial entry behind when they fail.
    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()>;

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value>;

    /// Encode without running any attached validators. Used to materialize
    /// defaults, which are checked once when the schema is resolved.
    fn write_unvalidated(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        self.write(store, key, value)
    }

    fn remove(&self, store: &dyn ParameterStore, key: &str) -> Result<()> {
        store.remove_entry(key)
    }

    fn validate(&self, value: &Value) -> Result<()> {
        let _ = value;
        Ok(())
    }

    fn normalize(&self, value: Value) -> Value {
        value
    }

    /// Whether a deserialized value may be kept in memory instead of re-read.
    /// Opaque encodings default to `false`.
    fn is_cacheable(&self) -> bool {
        false
    }

    /// Element serializer, for list serializers (possibly wrapped).
    fn element(&self) -> Option<&SerializerRef> {
        None
    }
}

/// Produces serializers for the declared types it recognizes.
pub trait SerializerFactory {
    fn can_serialize(&self, ty: &TypeDesc) -> bool;

    /// A ready serializer, or `None` if `ty` is not handled.
    fn create(&self, ty: &TypeDesc) -> Option<SerializerRef>;
}

/// Factory that hands out one fixed serializer for a single type.
#[derive(Debug)]
pub struct FixedFactory {
    ty: TypeDesc,
    serializer: SerializerRef,
}

impl FixedFactory {
    pub fn new(ty: TypeDesc, serializer: SerializerRef) -> Self {
        Self { ty, serializer }
    }
}

impl SerializerFactory for FixedFactory {
    fn can_serialize(&self, ty: &TypeDesc) -> bool {
        ty.key().is_some() && ty.key() == self.ty.key()
    }

    fn create(&self, ty: &TypeDesc) -> Option<SerializerRef> {
        self.can_serialize(ty).then(|| self.serializer.clone())
    }
}
