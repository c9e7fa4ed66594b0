//! # Attribute Binder
//!
//! Turns a [`Declaration`] into a [`Schema`] once, then binds that schema to
//! any number of `(store, prefix)` pairs.
//!
//! ## Resolution
//!
//! Each attribute's serializer comes from its explicit override or the
//! [`SerializerRegistry`]. Attributes with validators or an explicit default are
//! wrapped in a [`ValidatedSerializer`]. Resolution fails fast: an unresolvable
//! type, a duplicate name, or (with `validate_defaults`) an invalid default is a
//! [`ParamError::Bind`] here, never at first access.
//!
//! ## Defaults
//!
//! With [`BindConfig::validate_defaults`] on, every default is checked once:
//!
//! - A present default runs through the attribute's full validator chain and
//!   must encode.
//! - An absent default ([`crate::Value::None`]) only runs the validators declared on
//!   the attribute itself. Declaring `None` as the default of a type whose
//!   serializer rejects `None` on assignment is allowed.
//!
//! Defaults are materialized into the store on first read, bypassing validators.
//!
//! ## Binding
//!
//! A store key is `prefix + separator + name`, or the bare name when the prefix
//! is empty. Instances with distinct prefixes never collide; instances with the
//! same prefix see each other's writes, see [`BoundInstance`].

use crate::attributes::{AttributeSpec, Declaration};
use crate::config::BindConfig;
use crate::error::{ParamError, Result};
use crate::registry::SerializerRegistry;
use crate::serializers::{SerializerRef, ValidatedSerializer};
use crate::store::{MemoryStore, ParameterStore};
use crate::types::TypeDesc;
use crate::validators::{validate_all, Validator};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::debug;

mod cache;
mod instance;

pub use instance::{BoundInstance, ChangeEvent, SubscriptionToken};

pub(crate) use instance::InstanceInner;

const PROBE_KEY: &str = "default";

/// One declared attribute with its serializer resolved.
#[derive(Debug, Clone)]
pub struct ResolvedAttribute {
    pub name: String,
    pub declared: TypeDesc,
    pub serializer: SerializerRef,
    pub cacheable: bool,
}

/// A declaration resolved against a registry. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Schema {
    attributes: Rc<[ResolvedAttribute]>,
    config: BindConfig,
}

impl Schema {
    pub fn resolve(
        declaration: &Declaration,
        registry: &SerializerRegistry,
        config: BindConfig,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut attributes = Vec::with_capacity(declaration.len());

        for spec in declaration.attributes() {
            if !seen.insert(spec.name.as_str()) {
                return Err(ParamError::Bind(format!(
                    "attribute '{}' is declared twice",
                    spec.name
                )));
            }
            let attribute = resolve_attribute(spec, registry)?;
            if config.validate_defaults {
                check_default(spec, &attribute.serializer)?;
            }
            debug!(
                attribute = %attribute.name,
                declared = %attribute.declared,
                cacheable = attribute.cacheable,
                "resolved attribute"
            );
            attributes.push(attribute);
        }

        Ok(Self {
            attributes: attributes.into(),
            config,
        })
    }

    /// Bind to `store` under `prefix`.
    pub fn bind(&self, store: Rc<dyn ParameterStore>, prefix: impl Into<String>) -> BoundInstance {
        BoundInstance::new(self.clone(), store, prefix.into())
    }

    pub fn attributes(&self) -> &[ResolvedAttribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&ResolvedAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    pub(crate) fn index_of(&self, name: &str) -> Result<usize> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| ParamError::NotFound(format!("no attribute named '{}'", name)))
    }
}

fn resolve_attribute(spec: &AttributeSpec, registry: &SerializerRegistry) -> Result<ResolvedAttribute> {
    let base = registry
        .resolve_with_override(&spec.declared, spec.serializer.as_ref())
        .map_err(|e| match e {
            ParamError::Bind(reason) => ParamError::Bind(format!("attribute '{}': {}", spec.name, reason)),
            other => other,
        })?;

    let serializer: SerializerRef = if spec.needs_wrapping() {
        let mut wrapped = ValidatedSerializer::new(base, spec.validators.clone());
        if let Some(default) = &spec.default {
            wrapped = wrapped.with_default(default.clone());
        }
        Rc::new(wrapped)
    } else {
        base
    };

    let cacheable = serializer.is_cacheable() && spec.cache_hint != Some(false);
    Ok(ResolvedAttribute {
        name: spec.name.clone(),
        declared: spec.declared.clone(),
        serializer,
        cacheable,
    })
}

/// Validators declared on the attribute: its own plus any annotations on the
/// outermost declared type.
fn declared_validators(spec: &AttributeSpec) -> Vec<Rc<dyn Validator>> {
    let mut validators = spec.validators.clone();
    let mut ty = &spec.declared;
    while let TypeDesc::Annotated { inner, validators: annotated } = ty {
        validators.extend(annotated.iter().cloned());
        ty = inner;
    }
    validators
}

fn check_default(spec: &AttributeSpec, serializer: &SerializerRef) -> Result<()> {
    let default = serializer.default_value();
    let validated = if default.is_none() {
        validate_all(&declared_validators(spec), &default)
    } else {
        serializer.validate(&default)
    };
    validated
        .and_then(|_| {
            let scratch = MemoryStore::new();
            serializer.write_unvalidated(&scratch, PROBE_KEY, &default)
        })
        .map_err(|e| {
            ParamError::Bind(format!("default for attribute '{}' is invalid: {}", spec.name, e))
        })
}
