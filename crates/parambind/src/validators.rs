//! Value validators.
//!
//! A [`Validator`] is a stateless predicate checked before a value reaches the
//! store. Chains are conjunctions evaluated left to right; the first failure
//! stops the chain and is reported as [`ParamError::InvalidValue`].
//!
//! # Examples
//! ```
//! use parambind::validators::{Validator, WithinRange};
//! use parambind::Value;
//!
//! let range = WithinRange::new(0.0, 10.0);
//! assert!(range.validate(&Value::Int(10)).is_ok());
//! assert!(range.validate(&Value::Float(10.5)).is_err());
//! ```

use crate::error::{ParamError, Result};
use crate::types::CustomType;
use crate::value::{Value, ValueKind};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

pub trait Validator: fmt::Debug {
    fn validate(&self, value: &Value) -> Result<()>;
}

/// Run `validators` in order against `value`.
pub fn validate_all(validators: &[Rc<dyn Validator>], value: &Value) -> Result<()> {
    for validator in validators {
        validator.validate(value)?;
    }
    Ok(())
}

/// Rejects the absence marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNone;

impl Validator for NotNone {
    fn validate(&self, value: &Value) -> Result<()> {
        if value.is_none() {
            return Err(ParamError::invalid("value must not be None"));
        }
        Ok(())
    }
}

/// Requires a value of a given kind.
///
/// `Float` also accepts `Int` (the one sanctioned numeric widening). For
/// `Custom`, the wrapped type must match exactly.
#[derive(Debug, Clone, Copy)]
pub struct IsInstance {
    kind: ValueKind,
    custom: Option<CustomType>,
}

impl IsInstance {
    pub fn of(kind: ValueKind) -> Self {
        Self { kind, custom: None }
    }

    pub fn custom<T: Any>() -> Self {
        Self {
            kind: ValueKind::Custom,
            custom: Some(CustomType::of::<T>()),
        }
    }
}

impl Validator for IsInstance {
    fn validate(&self, value: &Value) -> Result<()> {
        let ok = match (self.kind, value) {
            (ValueKind::Float, Value::Int(_)) => true,
            (ValueKind::Custom, Value::Custom(opaque)) => {
                self.custom.map_or(true, |ty| ty.id == opaque.type_id())
            }
            (kind, value) => kind == value.kind(),
        };
        if ok {
            return Ok(());
        }
        let expected = match self.custom {
            Some(ty) => ty.name.to_string(),
            None => self.kind.to_string(),
        };
        Err(ParamError::invalid(format!(
            "expected {}, got {} ({:?})",
            expected,
            value.kind(),
            value
        )))
    }
}

fn number(value: &Value) -> Result<f64> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(value.as_float().unwrap_or_default()),
        other => Err(ParamError::invalid(format!(
            "expected a number, got {}",
            other.kind()
        ))),
    }
}

/// Number must be at least the bound.
#[derive(Debug, Clone, Copy)]
pub struct Minimum(pub f64);

impl Validator for Minimum {
    fn validate(&self, value: &Value) -> Result<()> {
        let n = number(value)?;
        if n < self.0 {
            return Err(ParamError::invalid(format!(
                "{} is less than the minimum {}",
                n, self.0
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Maximum(pub f64);

impl Validator for Maximum {
    fn validate(&self, value: &Value) -> Result<()> {
        let n = number(value)?;
        if n > self.0 {
            return Err(ParamError::invalid(format!(
                "{} is greater than the maximum {}",
                n, self.0
            )));
        }
        Ok(())
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy)]
pub struct WithinRange {
    pub min: f64,
    pub max: f64,
}

impl WithinRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Validator for WithinRange {
    fn validate(&self, value: &Value) -> Result<()> {
        let n = number(value)?;
        if n < self.min || n > self.max {
            return Err(ParamError::invalid(format!(
                "{} is not within [{}, {}]",
                n, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Value must be one of a fixed set.
#[derive(Debug, Clone)]
pub struct Choice(pub Vec<Value>);

impl Choice {
    pub fn new<I, T>(choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Choice(choices.into_iter().map(Into::into).collect())
    }
}

impl Validator for Choice {
    fn validate(&self, value: &Value) -> Result<()> {
        if !self.0.contains(value) {
            return Err(ParamError::invalid(format!(
                "{:?} is not one of {:?}",
                value, self.0
            )));
        }
        Ok(())
    }
}

/// Value must not be any of a fixed set.
#[derive(Debug, Clone)]
pub struct Exclude(pub Vec<Value>);

impl Exclude {
    pub fn new<I, T>(excluded: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Exclude(excluded.into_iter().map(Into::into).collect())
    }
}

impl Validator for Exclude {
    fn validate(&self, value: &Value) -> Result<()> {
        if self.0.contains(value) {
            return Err(ParamError::invalid(format!("{:?} is excluded", value)));
        }
        Ok(())
    }
}

type CheckFn = dyn Fn(&Value) -> std::result::Result<(), String>;

/// Validator built from a closure. The closure returns the rejection reason.
#[derive(Clone)]
pub struct FnValidator {
    name: &'static str,
    check: Rc<CheckFn>,
}

impl FnValidator {
    pub fn new<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + 'static,
    {
        Self {
            name,
            check: Rc::new(check),
        }
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnValidator({})", self.name)
    }
}

impl Validator for FnValidator {
    fn validate(&self, value: &Value) -> Result<()> {
        (self.check)(value).map_err(ParamError::InvalidValue)
    }
}
