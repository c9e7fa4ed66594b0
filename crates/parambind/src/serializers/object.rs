use super::Serializer;
use crate::error::{ParamError, Result};
use crate::host::HostModel;
use crate::store::ParameterStore;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Stored in place of a handle when the attribute holds no object.
const NO_OBJECT: &str = "";

/// References to host-owned objects of a declared kind.
///
/// The store holds the host handle, never the object. Reads always resolve the
/// handle against the live host, so this serializer is never cacheable; a
/// handle that no longer resolves reads back as [`Value::None`].
pub struct ObjectSerializer {
    host: Rc<dyn HostModel>,
    kind: String,
}

impl ObjectSerializer {
    pub fn new(host: Rc<dyn HostModel>, kind: impl Into<String>) -> Self {
        Self {
            host,
            kind: kind.into(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Debug for ObjectSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectSerializer({})", self.kind)
    }
}

impl Serializer for ObjectSerializer {
    fn default_value(&self) -> Value {
        Value::None
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        self.validate(value)?;
        let handle = match value {
            Value::Object(object) => self.host.handle_for(object).ok_or_else(|| {
                ParamError::invalid(format!("{:?} is not owned by the host model", object))
            })?,
            _ => NO_OBJECT.to_string(),
        };
        store.set_entry(key, &handle)
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        let resolved = store
            .get_entry(key)
            .filter(|handle| handle != NO_OBJECT)
            .and_then(|handle| self.host.resolve_handle(&handle));
        Ok(resolved.map(Value::Object).unwrap_or(Value::None))
    }

    fn validate(&self, value: &Value) -> Result<()> {
        match value {
            Value::None => Ok(()),
            Value::Object(object) if self.host.is_kind_compatible(object, &self.kind) => Ok(()),
            Value::Object(object) => Err(ParamError::invalid(format!(
                "{} is not compatible with {}",
                object.kind(),
                self.kind
            ))),
            other => Err(ParamError::invalid(format!(
                "expected an object of kind {}, got {}",
                self.kind,
                other.kind()
            ))),
        }
    }
}
