//! Declared attribute types.
//!
//! A [`TypeDesc`] is what a declaration says an attribute holds. The registry
//! turns it into a serializer. Structural forms (`List`, `Optional`,
//! `Annotated`) nest without limit.

use crate::validators::Validator;
use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// Identity of a user-registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomType {
    pub id: TypeId,
    pub name: &'static str,
}

impl CustomType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// Declared type of an attribute or a list element.
#[derive(Clone)]
pub enum TypeDesc {
    Int,
    Float,
    Bool,
    Str,
    Path,
    /// Reference to a host object of the named kind (or a derived kind).
    Object(String),
    Custom(CustomType),
    List(Box<TypeDesc>),
    /// Either a value of the inner type or [`crate::Value::None`].
    Optional(Box<TypeDesc>),
    /// The inner type with extra validators, e.g. constrained list elements.
    Annotated {
        inner: Box<TypeDesc>,
        validators: Vec<Rc<dyn Validator>>,
    },
}

/// Exact-match key for registry lookups.
///
/// Structural forms have no key; they are always resolved recursively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Int,
    Float,
    Bool,
    Str,
    Path,
    Object(String),
    Custom(TypeId),
}

impl TypeDesc {
    pub fn custom<T: Any>() -> Self {
        TypeDesc::Custom(CustomType::of::<T>())
    }

    pub fn object(kind: impl Into<String>) -> Self {
        TypeDesc::Object(kind.into())
    }

    pub fn list(element: TypeDesc) -> Self {
        TypeDesc::List(Box::new(element))
    }

    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Optional(Box::new(inner))
    }

    /// Attach validators to this type.
    pub fn annotated<V: Validator + 'static>(self, validator: V) -> Self {
        match self {
            TypeDesc::Annotated {
                inner,
                mut validators,
            } => {
                validators.push(Rc::new(validator));
                TypeDesc::Annotated { inner, validators }
            }
            other => {
                let validator: Rc<dyn Validator> = Rc::new(validator);
                TypeDesc::Annotated {
                    inner: Box::new(other),
                    validators: vec![validator],
                }
            }
        }
    }

    pub fn key(&self) -> Option<TypeKey> {
        match self {
            TypeDesc::Int => Some(TypeKey::Int),
            TypeDesc::Float => Some(TypeKey::Float),
            TypeDesc::Bool => Some(TypeKey::Bool),
            TypeDesc::Str => Some(TypeKey::Str),
            TypeDesc::Path => Some(TypeKey::Path),
            TypeDesc::Object(kind) => Some(TypeKey::Object(kind.clone())),
            TypeDesc::Custom(ty) => Some(TypeKey::Custom(ty.id)),
            TypeDesc::List(_) | TypeDesc::Optional(_) | TypeDesc::Annotated { .. } => None,
        }
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Int => f.write_str("int"),
            TypeDesc::Float => f.write_str("float"),
            TypeDesc::Bool => f.write_str("bool"),
            TypeDesc::Str => f.write_str("str"),
            TypeDesc::Path => f.write_str("path"),
            TypeDesc::Object(kind) => write!(f, "object<{}>", kind),
            TypeDesc::Custom(ty) => f.write_str(ty.name),
            TypeDesc::List(element) => write!(f, "list<{:?}>", element),
            TypeDesc::Optional(inner) => write!(f, "optional<{:?}>", inner),
            TypeDesc::Annotated { inner, validators } => {
                write!(f, "{:?} {:?}", inner, validators)
            }
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
