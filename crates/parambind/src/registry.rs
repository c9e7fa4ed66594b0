//! # Serializer Registry
//!
//! Maps declared types to serializers. This is an open registry: supporting a
//! new type means registering a factory for it, never touching the engine.
//!
//! ## Resolution Order
//!
//! 1. An explicit per-attribute serializer always wins (see
//!    [`SerializerRegistry::resolve_with_override`]).
//! 2. Registered factories, in insertion order, first exact match wins. A
//!    registration for a built-in type shadows the built-in.
//! 3. Built-ins: numbers, bools, strings, paths, and host object references.
//!
//! Structural forms resolve recursively with no depth limit:
//! `List<T>` becomes a [`ListSerializer`] over the resolution of `T`,
//! `Optional<T>` an [`OptionalSerializer`], and `Annotated` wraps its inner
//! resolution in a [`ValidatedSerializer`].
//!
//! Registering a type that is already registered replaces the earlier
//! registration in place; the last registration wins.

use crate::error::{ParamError, Result};
use crate::host::HostModel;
use crate::serializers::{
    BoolSerializer, FixedFactory, JsonFactory, ListSerializer, NumberSerializer, ObjectSerializer,
    OptionalSerializer, PathSerializer, SerializerFactory, SerializerRef, StringSerializer,
    ValidatedSerializer,
};
use crate::types::{TypeDesc, TypeKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

type Registration = (TypeKey, Rc<dyn SerializerFactory>);

#[derive(Default)]
pub struct SerializerRegistry {
    registrations: Vec<Registration>,
    host: Option<Rc<dyn HostModel>>,
}

impl SerializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host model used to resolve object-reference attributes.
    pub fn with_host(mut self, host: Rc<dyn HostModel>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn host(&self) -> Option<&Rc<dyn HostModel>> {
        self.host.as_ref()
    }

    /// Register `factory` for the leaf type `ty`.
    ///
    /// Structural types (`List`, `Optional`, `Annotated`) cannot be registered;
    /// they always resolve through their parts.
    pub fn register<F>(&mut self, ty: &TypeDesc, factory: F) -> Result<()>
    where
        F: SerializerFactory + 'static,
    {
        let key = ty.key().ok_or_else(|| {
            ParamError::Bind(format!("cannot register a serializer for structural type {:?}", ty))
        })?;
        let factory: Rc<dyn SerializerFactory> = Rc::new(factory);
        match self.registrations.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => {
                debug!(?key, "replacing serializer registration");
                existing.1 = factory;
            }
            None => {
                debug!(?key, "registering serializer");
                self.registrations.push((key, factory));
            }
        }
        Ok(())
    }

    /// Register one ready serializer instance for `ty`.
    pub fn register_serializer(&mut self, ty: &TypeDesc, serializer: SerializerRef) -> Result<()> {
        self.register(ty, FixedFactory::new(ty.clone(), serializer))
    }

    /// Register a serde type, stored as JSON.
    pub fn register_serde<T>(&mut self) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Default + fmt::Debug + PartialEq + Any,
    {
        self.register(&TypeDesc::custom::<T>(), JsonFactory::<T>::new())
    }

    /// Drop the registration for `ty`. Returns whether one existed.
    pub fn unregister(&mut self, ty: &TypeDesc) -> bool {
        let Some(key) = ty.key() else {
            return false;
        };
        let before = self.registrations.len();
        self.registrations.retain(|(k, _)| *k != key);
        before != self.registrations.len()
    }

    pub fn is_registered(&self, ty: &TypeDesc) -> bool {
        ty.key()
            .is_some_and(|key| self.registrations.iter().any(|(k, _)| *k == key))
    }

    /// Resolve `ty`, letting `explicit` win when present.
    pub fn resolve_with_override(
        &self,
        ty: &TypeDesc,
        explicit: Option<&SerializerRef>,
    ) -> Result<SerializerRef> {
        match explicit {
            Some(serializer) => Ok(serializer.clone()),
            None => self.resolve(ty),
        }
    }

    pub fn resolve(&self, ty: &TypeDesc) -> Result<SerializerRef> {
        match ty {
            TypeDesc::Annotated { inner, validators } => {
                let base = self.resolve(inner)?;
                Ok(Rc::new(ValidatedSerializer::new(base, validators.clone())))
            }
            TypeDesc::List(element) => Ok(ListSerializer::checked(self.resolve(element)?)),
            TypeDesc::Optional(inner) => Ok(Rc::new(OptionalSerializer::new(self.resolve(inner)?))),
            leaf => self
                .resolve_registered(leaf)
                .map(Ok)
                .unwrap_or_else(|| self.resolve_builtin(leaf)),
        }
    }

    fn resolve_registered(&self, ty: &TypeDesc) -> Option<SerializerRef> {
        let key = ty.key()?;
        self.registrations
            .iter()
            .filter(|(k, _)| *k == key)
            .find(|(_, factory)| factory.can_serialize(ty))
            .and_then(|(_, factory)| factory.create(ty))
    }

    fn resolve_builtin(&self, ty: &TypeDesc) -> Result<SerializerRef> {
        let builtin = NumberSerializer::create(ty)
            .or_else(|| BoolSerializer::create(ty))
            .or_else(|| StringSerializer::create(ty))
            .or_else(|| PathSerializer::create(ty));
        if let Some(serializer) = builtin {
            return Ok(serializer);
        }
        match ty {
            TypeDesc::Object(kind) => {
                let host = self.host.clone().ok_or_else(|| {
                    ParamError::Bind(format!(
                        "object attribute of kind '{}' needs a host model",
                        kind
                    ))
                })?;
                Ok(Rc::new(ObjectSerializer::new(host, kind.clone())))
            }
            other => Err(ParamError::Bind(format!(
                "no serializer registered for type {:?}",
                other
            ))),
        }
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field(
                "registrations",
                &self.registrations.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("host", &self.host.is_some())
            .finish()
    }
}
