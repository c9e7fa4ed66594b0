use super::{Serializer, SerializerRef};
use crate::error::{ParamError, Result};
use crate::store::{MemoryStore, ParameterStore};
use crate::value::Value;

const INNER_KEY: &str = "value";

/// A value of the inner type, or [`Value::None`].
///
/// Stored as JSON: `null` for absence, otherwise the inner encoding as a JSON
/// string, so an empty string and absence stay distinguishable.
#[derive(Debug, Clone)]
pub struct OptionalSerializer {
    inner: SerializerRef,
}

impl OptionalSerializer {
    pub fn new(inner: SerializerRef) -> Self {
        Self { inner }
    }
}

impl Serializer for OptionalSerializer {
    fn default_value(&self) -> Value {
        Value::None
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        let encoded: Option<String> = if value.is_none() {
            None
        } else {
            let scratch = MemoryStore::new();
            self.inner.write(&scratch, INNER_KEY, value)?;
            scratch.get_entry(INNER_KEY)
        };
        store.set_entry(key, &serde_json::to_string(&encoded)?)
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        let text = store
            .get_entry(key)
            .ok_or_else(|| ParamError::decode(key, "no entry in store"))?;
        let encoded: Option<String> =
            serde_json::from_str(&text).map_err(|e| ParamError::decode(key, e))?;
        match encoded {
            None => Ok(Value::None),
            Some(inner) => {
                let scratch = MemoryStore::new();
                scratch.set_entry(INNER_KEY, &inner)?;
                self.inner
                    .read(&scratch, INNER_KEY)
                    .map_err(|e| ParamError::decode(key, e))
            }
        }
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_none() {
            return Ok(());
        }
        self.inner.validate(value)
    }

    fn normalize(&self, value: Value) -> Value {
        if value.is_none() {
            return value;
        }
        self.inner.normalize(value)
    }

    fn is_cacheable(&self) -> bool {
        self.inner.is_cacheable()
    }
}
