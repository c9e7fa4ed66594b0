use super::{Serializer, SerializerRef};
use crate::error::Result;
use crate::store::ParameterStore;
use crate::validators::{validate_all, Validator};
use crate::value::Value;
use std::rc::Rc;

/// A base serializer composed with an ordered validator chain and an
/// optional explicit default.
///
/// `write` runs the whole chain first; a rejection leaves the store untouched.
#[derive(Debug, Clone)]
pub struct ValidatedSerializer {
    base: SerializerRef,
    validators: Vec<Rc<dyn Validator>>,
    default: Option<Value>,
}

impl ValidatedSerializer {
    pub fn new(base: SerializerRef, validators: Vec<Rc<dyn Validator>>) -> Self {
        Self {
            base,
            validators,
            default: None,
        }
    }

    /// Use `default` instead of the base serializer's default.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn base(&self) -> &SerializerRef {
        &self.base
    }

    pub fn validators(&self) -> &[Rc<dyn Validator>] {
        &self.validators
    }
}

impl Serializer for ValidatedSerializer {
    fn default_value(&self) -> Value {
        match &self.default {
            Some(value) => value.clone(),
            None => self.base.default_value(),
        }
    }

    fn is_in(&self, store: &dyn ParameterStore, key: &str) -> bool {
        self.base.is_in(store, key)
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        self.validate(value)?;
        self.base.write(store, key, value)
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        self.base.read(store, key)
    }

    fn write_unvalidated(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        self.base.write_unvalidated(store, key, value)
    }

    fn remove(&self, store: &dyn ParameterStore, key: &str) -> Result<()> {
        self.base.remove(store, key)
    }

    fn validate(&self, value: &Value) -> Result<()> {
        validate_all(&self.validators, value)?;
        self.base.validate(value)
    }

    fn normalize(&self, value: Value) -> Value {
        self.base.normalize(value)
    }

    fn is_cacheable(&self) -> bool {
        self.base.is_cacheable()
    }

    fn element(&self) -> Option<&SerializerRef> {
        self.base.element()
    }
}
