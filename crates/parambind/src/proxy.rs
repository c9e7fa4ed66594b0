//! # Observable List Proxy
//!
//! [`ListProxy`] is a live view over a list attribute of a [`BoundInstance`].
//! It owns no data: every query re-reads the attribute (through the instance
//! cache when the list is cache-eligible) and every mutation writes the whole
//! attribute back.
//!
//! ## Mutation Contract
//!
//! Each mutating call:
//!
//! 1. reads the current value and applies the change to a private copy,
//! 2. writes the full value through the attribute's serializer, which validates
//!    every element first, so a rejected element leaves the store untouched,
//! 3. produces exactly one store write, hence one [`crate::ChangeEvent`].
//!
//! Batch operations (`extend`, `concat_in_place`, `repeat_in_place`) are still
//! one write.
//!
//! ## Nested Lists
//!
//! For `List<List<T>>`, [`ListProxy::sublist`] returns a proxy addressing an
//! inner list by index path. Mutating it rewrites the whole outer attribute.
//!
//! ## Binary Operators
//!
//! `proxy + seq`, `seq + proxy` and `proxy * n` would build detached copies
//! that look like live lists. They are implemented only to fail with
//! [`ParamError::Unsupported`]. Use [`ListProxy::concat_in_place`] /
//! [`ListProxy::repeat_in_place`] to mutate, or [`ListProxy::to_vec`] to detach.
//!
//! Indices out of range are reported as [`ParamError::NotFound`].
//!
//! [`BoundInstance`]: crate::BoundInstance

use crate::binder::InstanceInner;
use crate::error::{ParamError, Result};
use crate::serializers::SerializerRef;
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};
use std::rc::Rc;

/// Store-backed view over a (possibly nested) list attribute.
#[derive(Clone)]
pub struct ListProxy {
    instance: Rc<InstanceInner>,
    index: usize,
    path: Vec<usize>,
    serializer: SerializerRef,
}

impl ListProxy {
    pub(crate) fn new(instance: Rc<InstanceInner>, index: usize, serializer: SerializerRef) -> Self {
        Self {
            instance,
            index,
            path: Vec::new(),
            serializer,
        }
    }

    /// Attribute name this proxy writes through.
    pub fn name(&self) -> &str {
        &self.instance.attribute(self.index).name
    }

    /// Index path from the attribute root; empty for the root list.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    fn with_items<R>(&self, f: impl FnOnce(&[Value]) -> Result<R>) -> Result<R> {
        let root = self.instance.read(self.index)?;
        f(navigate(&root, &self.path)?)
    }

    /// Apply `f` to a copy of the list and write the whole attribute back once.
    /// Nothing is written if `f` fails.
    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> Result<R>) -> Result<R> {
        let mut root = self.instance.read(self.index)?;
        let result = f(navigate_mut(&mut root, &self.path)?)?;
        self.instance.write(self.index, root)?;
        Ok(result)
    }

    pub fn len(&self) -> Result<usize> {
        self.with_items(|items| Ok(items.len()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    pub fn get(&self, index: usize) -> Result<Value> {
        self.with_items(|items| {
            items
                .get(index)
                .cloned()
                .ok_or_else(|| out_of_range(index, items.len()))
        })
    }

    pub fn contains(&self, value: &Value) -> Result<bool> {
        self.with_items(|items| Ok(items.contains(value)))
    }

    /// Position of the first element equal to `value`.
    pub fn position(&self, value: &Value) -> Result<Option<usize>> {
        self.with_items(|items| Ok(items.iter().position(|item| item == value)))
    }

    /// Detached deep copy. Later mutation on either side does not affect the other.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.with_items(|items| Ok(items.to_vec()))
    }

    /// Proxy over the inner list at `index` of a nested list attribute.
    pub fn sublist(&self, index: usize) -> Result<ListProxy> {
        let inner = self.serializer.element().cloned().ok_or_else(|| {
            ParamError::Unsupported(format!("'{}' has no element serializer", self.name()))
        })?;
        if inner.element().is_none() {
            return Err(ParamError::Unsupported(format!(
                "elements of '{}' are not lists",
                self.name()
            )));
        }
        let len = self.len()?;
        if index >= len {
            return Err(out_of_range(index, len));
        }
        let mut path = self.path.clone();
        path.push(index);
        Ok(ListProxy {
            instance: self.instance.clone(),
            index: self.index,
            path,
            serializer: inner,
        })
    }

    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate(|items| {
            let len = items.len();
            let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
            *slot = value;
            Ok(())
        })
    }

    pub fn append(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate(|items| {
            items.push(value);
            Ok(())
        })
    }

    /// Insert before `index`. An index past the end appends.
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.mutate(|items| {
            let at = index.min(items.len());
            items.insert(at, value);
            Ok(())
        })
    }

    /// Remove the first element equal to `value`.
    pub fn remove(&self, value: &Value) -> Result<()> {
        self.mutate(|items| {
            let at = items
                .iter()
                .position(|item| item == value)
                .ok_or_else(|| ParamError::NotFound(format!("{:?} is not in the list", value)))?;
            items.remove(at);
            Ok(())
        })
    }

    /// Remove and return the element at `index`.
    pub fn pop(&self, index: usize) -> Result<Value> {
        self.mutate(|items| {
            if index >= items.len() {
                return Err(out_of_range(index, items.len()));
            }
            Ok(items.remove(index))
        })
    }

    /// Remove and return the last element.
    pub fn pop_last(&self) -> Result<Value> {
        self.mutate(|items| {
            items
                .pop()
                .ok_or_else(|| ParamError::NotFound("pop from an empty list".to_string()))
        })
    }

    /// Remove the element at `index`, discarding it.
    pub fn delete(&self, index: usize) -> Result<()> {
        self.pop(index).map(|_| ())
    }

    pub fn clear(&self) -> Result<()> {
        self.mutate(|items| {
            items.clear();
            Ok(())
        })
    }

    pub fn extend<I, T>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.mutate(|items| {
            items.extend(values);
            Ok(())
        })
    }

    /// In-place concatenation (`list += values`).
    pub fn concat_in_place<I, T>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.extend(values)
    }

    /// In-place repetition (`list *= times`). Zero empties the list.
    pub fn repeat_in_place(&self, times: usize) -> Result<()> {
        self.mutate(|items| {
            let total = items.len().checked_mul(times).ok_or_else(|| {
                ParamError::Unsupported(format!(
                    "repeating a list of length {} {} times overflows",
                    items.len(),
                    times
                ))
            })?;
            *items = items.iter().cloned().cycle().take(total).collect();
            Ok(())
        })
    }

    pub fn reverse(&self) -> Result<()> {
        self.mutate(|items| {
            items.reverse();
            Ok(())
        })
    }

    /// Ascending sort. Fails with `Unsupported`, writing nothing, when the
    /// elements are not totally ordered against each other.
    pub fn sort(&self) -> Result<()> {
        self.mutate(|items| {
            if let Some(first) = items.first() {
                let unordered = items.iter().find(|item| {
                    item.compare(item) != Some(Ordering::Equal) || item.compare(first).is_none()
                });
                if let Some(item) = unordered {
                    return Err(ParamError::Unsupported(format!(
                        "cannot order {:?} against {:?}",
                        item, first
                    )));
                }
            }
            items.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
            Ok(())
        })
    }

    /// Stable sort with a caller-supplied comparator.
    pub fn sort_by<F>(&self, compare: F) -> Result<()>
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        self.mutate(|items| {
            items.sort_by(compare);
            Ok(())
        })
    }

    /// Always fails: use [`ListProxy::concat_in_place`] or detach with [`ListProxy::to_vec`].
    pub fn concat<I, T>(&self, _values: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Err(unsupported_binary("+"))
    }

    /// Always fails: use [`ListProxy::repeat_in_place`] or detach with [`ListProxy::to_vec`].
    pub fn repeat(&self, _times: usize) -> Result<Vec<Value>> {
        Err(unsupported_binary("*"))
    }
}

fn out_of_range(index: usize, len: usize) -> ParamError {
    ParamError::NotFound(format!("index {} out of range for list of length {}", index, len))
}

fn unsupported_binary(op: &str) -> ParamError {
    ParamError::Unsupported(format!(
        "'{}' on a list proxy would detach a copy; mutate in place or call to_vec() first",
        op
    ))
}

fn navigate<'v>(root: &'v Value, path: &[usize]) -> Result<&'v [Value]> {
    let mut current = root;
    for &step in path {
        let items = as_items(current)?;
        current = items.get(step).ok_or_else(|| out_of_range(step, items.len()))?;
    }
    as_items(current)
}

fn navigate_mut<'v>(root: &'v mut Value, path: &[usize]) -> Result<&'v mut Vec<Value>> {
    let mut current = root;
    for &step in path {
        let items = as_items_mut(current)?;
        let len = items.len();
        current = items.get_mut(step).ok_or_else(|| out_of_range(step, len))?;
    }
    as_items_mut(current)
}

fn as_items(value: &Value) -> Result<&[Value]> {
    value
        .as_list()
        .ok_or_else(|| ParamError::invalid(format!("expected a list, found {}", value.kind())))
}

fn as_items_mut(value: &mut Value) -> Result<&mut Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(ParamError::invalid(format!(
            "expected a list, found {}",
            other.kind()
        ))),
    }
}

impl fmt::Debug for ListProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListProxy")
            .field("key", &self.instance.key(self.index))
            .field("path", &self.path)
            .finish()
    }
}

impl<T: Into<Value>> Add<Vec<T>> for &ListProxy {
    type Output = Result<Vec<Value>>;

    fn add(self, rhs: Vec<T>) -> Self::Output {
        self.concat(rhs)
    }
}

impl Add<&ListProxy> for Vec<Value> {
    type Output = Result<Vec<Value>>;

    fn add(self, _rhs: &ListProxy) -> Self::Output {
        Err(unsupported_binary("+"))
    }
}

impl Mul<usize> for &ListProxy {
    type Output = Result<Vec<Value>>;

    fn mul(self, rhs: usize) -> Self::Output {
        self.repeat(rhs)
    }
}

impl Mul<&ListProxy> for usize {
    type Output = Result<Vec<Value>>;

    fn mul(self, _rhs: &ListProxy) -> Self::Output {
        Err(unsupported_binary("*"))
    }
}
