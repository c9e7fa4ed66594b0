use super::{Serializer, SerializerFactory, SerializerRef, ValidatedSerializer};
use crate::error::{ParamError, Result};
use crate::store::ParameterStore;
use crate::types::TypeDesc;
use crate::validators::{IsInstance, NotNone, Validator};
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

const NULL: &str = "null";

/// Serializer for any serde type, stored as JSON.
///
/// [`Value::None`] is stored as `null`, so an attribute may declare absence as
/// its default even though assignment of `None` is rejected by `NotNone`.
///
/// User types are opaque to the engine: their stored form cannot be trusted to
/// round-trip without re-running this logic, so they are never cached.
pub struct JsonSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T>
where
    T: Serialize + DeserializeOwned + Default + fmt::Debug + PartialEq + Any,
{
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// The serializer wrapped with `NotNone` and an exact type check.
    pub fn checked() -> SerializerRef {
        let validators: Vec<Rc<dyn Validator>> =
            vec![Rc::new(NotNone), Rc::new(IsInstance::custom::<T>())];
        Rc::new(ValidatedSerializer::new(Rc::new(Self::new()), validators))
    }
}

impl<T> Default for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned + Default + fmt::Debug + PartialEq + Any,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonSerializer<{}>", std::any::type_name::<T>())
    }
}

impl<T> Serializer for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned + Default + fmt::Debug + PartialEq + Any,
{
    fn default_value(&self) -> Value {
        Value::custom(T::default())
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        if value.is_none() {
            return store.set_entry(key, NULL);
        }
        let typed = value.downcast_ref::<T>().ok_or_else(|| {
            ParamError::invalid(format!(
                "expected {}, got {:?}",
                std::any::type_name::<T>(),
                value
            ))
        })?;
        store.set_entry(key, &serde_json::to_string(typed)?)
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        let text = store
            .get_entry(key)
            .ok_or_else(|| ParamError::decode(key, "no entry in store"))?;
        if text.trim() == NULL {
            return Ok(Value::None);
        }
        let typed: T = serde_json::from_str(&text).map_err(|e| ParamError::decode(key, e))?;
        Ok(Value::custom(typed))
    }
}

/// Factory registered by [`crate::SerializerRegistry::register_serde`].
pub(crate) struct JsonFactory<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFactory<T> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> SerializerFactory for JsonFactory<T>
where
    T: Serialize + DeserializeOwned + Default + fmt::Debug + PartialEq + Any,
{
    fn can_serialize(&self, ty: &TypeDesc) -> bool {
        matches!(ty, TypeDesc::Custom(custom) if custom.id == std::any::TypeId::of::<T>())
    }

    fn create(&self, ty: &TypeDesc) -> Option<SerializerRef> {
        self.can_serialize(ty).then(JsonSerializer::<T>::checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Spacing {
        x: f64,
        y: f64,
        z: f64,
    }

    #[test]
    fn test_json_round_trip() {
        let store = MemoryStore::new();
        let serializer = JsonSerializer::<Spacing>::new();
        let value = Value::custom(Spacing { x: 1.0, y: 0.5, z: 2.0 });

        serializer.write(&store, "spacing", &value).unwrap();
        assert_eq!(
            store.get_entry("spacing"),
            Some(r#"{"x":1.0,"y":0.5,"z":2.0}"#.to_string())
        );
        assert_eq!(serializer.read(&store, "spacing").unwrap(), value);
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let store = MemoryStore::new();
        let serializer = JsonSerializer::<Spacing>::new();
        assert!(matches!(
            serializer.write(&store, "spacing", &Value::Int(1)),
            Err(ParamError::InvalidValue(_))
        ));
        assert!(!store.has_entry("spacing"));
    }

    #[test]
    fn test_none_is_stored_as_null() {
        let store = MemoryStore::new();
        let serializer = JsonSerializer::<Spacing>::new();
        serializer.write(&store, "spacing", &Value::None).unwrap();
        assert_eq!(store.get_entry("spacing"), Some("null".to_string()));
        assert_eq!(serializer.read(&store, "spacing").unwrap(), Value::None);
    }

    #[test]
    fn test_checked_rejects_none_assignment() {
        let store = MemoryStore::new();
        let serializer = JsonSerializer::<Spacing>::checked();
        assert!(serializer.write(&store, "spacing", &Value::None).is_err());
        serializer
            .write_unvalidated(&store, "spacing", &Value::None)
            .unwrap();
        assert_eq!(serializer.read(&store, "spacing").unwrap(), Value::None);
    }

    #[test]
    fn test_default_and_cacheability() {
        let serializer = JsonSerializer::<Spacing>::new();
        assert_eq!(serializer.default_value(), Value::custom(Spacing::default()));
        assert!(!serializer.is_cacheable());
    }

    #[test]
    fn test_factory_matches_only_its_type() {
        let factory = JsonFactory::<Spacing>::new();
        assert!(factory.can_serialize(&TypeDesc::custom::<Spacing>()));
        assert!(!factory.can_serialize(&TypeDesc::custom::<String>()));
        assert!(factory.create(&TypeDesc::Int).is_none());
    }
}
