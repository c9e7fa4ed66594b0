use super::{Serializer, SerializerRef, ValidatedSerializer};
use crate::error::{ParamError, Result};
use crate::store::ParameterStore;
use crate::types::TypeDesc;
use crate::validators::{IsInstance, NotNone, Validator};
use crate::value::{Value, ValueKind};
use std::path::PathBuf;
use std::rc::Rc;

fn checked(base: impl Serializer + 'static, kind: ValueKind) -> SerializerRef {
    let validators: Vec<Rc<dyn Validator>> = vec![Rc::new(NotNone), Rc::new(IsInstance::of(kind))];
    Rc::new(ValidatedSerializer::new(Rc::new(base), validators))
}

fn raw(store: &dyn ParameterStore, key: &str) -> Result<String> {
    store
        .get_entry(key)
        .ok_or_else(|| ParamError::decode(key, "no entry in store"))
}

/// Integers and floats. A float serializer widens assigned integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSerializer {
    float: bool,
}

impl NumberSerializer {
    pub fn int() -> Self {
        Self { float: false }
    }

    pub fn float() -> Self {
        Self { float: true }
    }

    pub fn can_serialize(ty: &TypeDesc) -> bool {
        matches!(ty, TypeDesc::Int | TypeDesc::Float)
    }

    pub fn create(ty: &TypeDesc) -> Option<SerializerRef> {
        match ty {
            TypeDesc::Int => Some(checked(Self::int(), ValueKind::Int)),
            TypeDesc::Float => Some(checked(Self::float(), ValueKind::Float)),
            _ => None,
        }
    }
}

impl Serializer for NumberSerializer {
    fn default_value(&self) -> Value {
        if self.float {
            Value::Float(0.0)
        } else {
            Value::Int(0)
        }
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        let encoded = match (self.float, value) {
            (false, Value::Int(v)) => v.to_string(),
            (true, Value::Int(_) | Value::Float(_)) => {
                value.as_float().unwrap_or_default().to_string()
            }
            (_, other) => {
                return Err(ParamError::invalid(format!(
                    "cannot store {} as a number",
                    other.kind()
                )))
            }
        };
        store.set_entry(key, &encoded)
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        let text = raw(store, key)?;
        if self.float {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|e| ParamError::decode(key, e))
        } else {
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|e| ParamError::decode(key, e))
        }
    }

    fn normalize(&self, value: Value) -> Value {
        match (self.float, value) {
            (true, Value::Int(v)) => Value::Float(v as f64),
            (_, other) => other,
        }
    }

    fn is_cacheable(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolSerializer;

impl BoolSerializer {
    pub fn can_serialize(ty: &TypeDesc) -> bool {
        matches!(ty, TypeDesc::Bool)
    }

    pub fn create(ty: &TypeDesc) -> Option<SerializerRef> {
        Self::can_serialize(ty).then(|| checked(BoolSerializer, ValueKind::Bool))
    }
}

impl Serializer for BoolSerializer {
    fn default_value(&self) -> Value {
        Value::Bool(false)
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Bool(v) => store.set_entry(key, if *v { "true" } else { "false" }),
            other => Err(ParamError::invalid(format!(
                "cannot store {} as a bool",
                other.kind()
            ))),
        }
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        match raw(store, key)?.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(ParamError::decode(key, format!("'{}' is not a bool", other))),
        }
    }

    fn is_cacheable(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringSerializer;

impl StringSerializer {
    pub fn can_serialize(ty: &TypeDesc) -> bool {
        matches!(ty, TypeDesc::Str)
    }

    pub fn create(ty: &TypeDesc) -> Option<SerializerRef> {
        Self::can_serialize(ty).then(|| checked(StringSerializer, ValueKind::Str))
    }
}

impl Serializer for StringSerializer {
    fn default_value(&self) -> Value {
        Value::Str(String::new())
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Str(s) => store.set_entry(key, s),
            other => Err(ParamError::invalid(format!(
                "cannot store {} as a string",
                other.kind()
            ))),
        }
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        raw(store, key).map(Value::Str)
    }

    fn is_cacheable(&self) -> bool {
        true
    }
}

/// Filesystem paths, stored as their string form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathSerializer;

impl PathSerializer {
    pub fn can_serialize(ty: &TypeDesc) -> bool {
        matches!(ty, TypeDesc::Path)
    }

    pub fn create(ty: &TypeDesc) -> Option<SerializerRef> {
        Self::can_serialize(ty).then(|| checked(PathSerializer, ValueKind::Path))
    }
}

impl Serializer for PathSerializer {
    fn default_value(&self) -> Value {
        Value::Path(PathBuf::new())
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Path(p) => store.set_entry(key, &p.to_string_lossy()),
            other => Err(ParamError::invalid(format!(
                "cannot store {} as a path",
                other.kind()
            ))),
        }
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        raw(store, key).map(|s| Value::Path(PathBuf::from(s)))
    }

    fn is_cacheable(&self) -> bool {
        true
    }
}
