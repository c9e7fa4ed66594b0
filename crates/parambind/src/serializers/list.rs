use super::{Serializer, SerializerRef, ValidatedSerializer};
use crate::error::{ParamError, Result};
use crate::store::{MemoryStore, ParameterStore};
use crate::validators::{IsInstance, NotNone, Validator};
use crate::value::{Value, ValueKind};
use std::rc::Rc;

const ITEM_KEY: &str = "item";

/// Homogeneous list of values sharing one element serializer.
///
/// The stored form is a JSON array holding each element's own store encoding
/// (`null` where the element wrote nothing). Elements are encoded through a
/// scratch [`MemoryStore`], so any serializer works as an element serializer,
/// including another `ListSerializer`.
#[derive(Debug, Clone)]
pub struct ListSerializer {
    element: SerializerRef,
}

impl ListSerializer {
    pub fn new(element: SerializerRef) -> Self {
        Self { element }
    }

    /// List serializer wrapped with the standard `NotNone` + list kind checks.
    pub fn checked(element: SerializerRef) -> SerializerRef {
        let validators: Vec<Rc<dyn Validator>> =
            vec![Rc::new(NotNone), Rc::new(IsInstance::of(ValueKind::List))];
        Rc::new(ValidatedSerializer::new(
            Rc::new(Self::new(element)),
            validators,
        ))
    }

    fn items<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        value.as_list().ok_or_else(|| {
            ParamError::invalid(format!("expected a list, got {}", value.kind()))
        })
    }

    /// Encode every element, failing before anything reaches the real store.
    pub fn encode(&self, value: &Value) -> Result<String> {
        let items = self.items(value)?;
        let mut encoded: Vec<Option<String>> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let scratch = MemoryStore::new();
            self.element
                .write(&scratch, ITEM_KEY, item)
                .map_err(|e| element_error(index, e))?;
            encoded.push(scratch.get_entry(ITEM_KEY));
        }
        Ok(serde_json::to_string(&encoded)?)
    }

    pub fn decode(&self, key: &str, text: &str) -> Result<Value> {
        let encoded: Vec<Option<String>> =
            serde_json::from_str(text).map_err(|e| ParamError::decode(key, e))?;
        let mut items = Vec::with_capacity(encoded.len());
        for (index, entry) in encoded.into_iter().enumerate() {
            let scratch = MemoryStore::new();
            if let Some(entry) = entry {
                scratch.set_entry(ITEM_KEY, &entry)?;
            }
            let item = if self.element.is_in(&scratch, ITEM_KEY) {
                self.element
                    .read(&scratch, ITEM_KEY)
                    .map_err(|e| ParamError::decode(key, format!("element {}: {}", index, e)))?
            } else {
                self.element.default_value()
            };
            items.push(item);
        }
        Ok(Value::List(items))
    }
}

fn element_error(index: usize, err: ParamError) -> ParamError {
    match err {
        ParamError::InvalidValue(reason) => {
            ParamError::InvalidValue(format!("element {}: {}", index, reason))
        }
        other => other,
    }
}

impl Serializer for ListSerializer {
    fn default_value(&self) -> Value {
        Value::List(Vec::new())
    }

    fn write(&self, store: &dyn ParameterStore, key: &str, value: &Value) -> Result<()> {
        let encoded = self.encode(value)?;
        store.set_entry(key, &encoded)
    }

    fn read(&self, store: &dyn ParameterStore, key: &str) -> Result<Value> {
        let text = store
            .get_entry(key)
            .ok_or_else(|| ParamError::decode(key, "no entry in store"))?;
        self.decode(key, &text)
    }

    fn validate(&self, value: &Value) -> Result<()> {
        for (index, item) in self.items(value)?.iter().enumerate() {
            self.element
                .validate(item)
                .map_err(|e| element_error(index, e))?;
        }
        Ok(())
    }

    fn normalize(&self, value: Value) -> Value {
        match value {
            Value::List(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.element.normalize(item))
                    .collect(),
            ),
            other => other,
        }
    }

    fn is_cacheable(&self) -> bool {
        self.element.is_cacheable()
    }

    fn element(&self) -> Option<&SerializerRef> {
        Some(&self.element)
    }
}
