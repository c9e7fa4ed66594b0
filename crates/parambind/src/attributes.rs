//! # Attribute Declarations
//!
//! A [`Declaration`] is the explicit, ordered list of attributes a bound
//! instance exposes. Each entry is an [`AttributeSpec`]: a name, a declared
//! [`TypeDesc`], and optional modifiers.
//!
//! ## Modifiers
//!
//! | Modifier | Effect |
//! |----------|--------|
//! | `validator` | Appended to the attribute's ordered validator chain |
//! | `default` | Value used when the store has no entry (overrides the serializer's) |
//! | `serializer` | Bypasses type-based resolution entirely |
//! | `cached(false)` | Opts an otherwise cache-eligible attribute out of the cache |
//!
//! Declarations are consumed once, by [`crate::Schema::resolve`].
//!
//! ```
//! use parambind::{AttributeSpec, Declaration, TypeDesc, validators::WithinRange};
//!
//! let declaration = Declaration::new()
//!     .attr("x", TypeDesc::Int)
//!     .push(
//!         AttributeSpec::new("opacity", TypeDesc::Float)
//!             .validator(WithinRange::new(0.0, 1.0))
//!             .default(1.0),
//!     );
//! assert_eq!(declaration.len(), 2);
//! ```

use crate::serializers::SerializerRef;
use crate::types::TypeDesc;
use crate::validators::Validator;
use crate::value::Value;
use std::rc::Rc;

/// Specification for a single declared attribute.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub name: String,
    pub declared: TypeDesc,
    pub validators: Vec<Rc<dyn Validator>>,
    /// Distinct from "no default given": `Some(Value::None)` is a real default.
    pub default: Option<Value>,
    pub serializer: Option<SerializerRef>,
    /// `Some(false)` opts out of caching. `None` follows the serializer.
    pub cache_hint: Option<bool>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, declared: TypeDesc) -> Self {
        Self {
            name: name.into(),
            declared,
            validators: Vec::new(),
            default: None,
            serializer: None,
            cache_hint: None,
        }
    }

    pub fn validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Rc::new(validator));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn serializer(mut self, serializer: SerializerRef) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn cached(mut self, cached: bool) -> Self {
        self.cache_hint = Some(cached);
        self
    }

    /// Whether the binder must wrap the resolved serializer.
    pub fn needs_wrapping(&self) -> bool {
        !self.validators.is_empty() || self.default.is_some()
    }
}

/// Ordered set of attribute specs.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    attributes: Vec<AttributeSpec>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a plain attribute with no modifiers.
    pub fn attr(self, name: impl Into<String>, declared: TypeDesc) -> Self {
        self.push(AttributeSpec::new(name, declared))
    }

    /// Declare an attribute with modifiers.
    pub fn push(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<AttributeSpec> for Declaration {
    fn from_iter<I: IntoIterator<Item = AttributeSpec>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
