use alloc::{string::ToString as _, sync::Arc, vec::Vec};
use core::any::{type_name, Any};

use crate::{errors::InstantiateErrorKind, value::Value};

/// Resolved constructor arguments, in declared order.
///
/// Accessors take a 0-based index and report failures with the 1-based position
/// used everywhere else in error messages.
#[derive(Debug, Clone, Default)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    #[inline]
    #[must_use]
    pub(crate) const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if there is no argument at `index`
    pub fn value(&self, index: usize) -> Result<&Value, InstantiateErrorKind> {
        self.values
            .get(index)
            .ok_or(InstantiateErrorKind::MissingArgument { position: index + 1 })
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument isn't an instance of `T`
    pub fn instance<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, InstantiateErrorKind> {
        let value = self.value(index)?;
        value
            .as_instance()
            .and_then(|instance| instance.downcast::<T>())
            .ok_or_else(|| mismatch(index, type_name::<T>(), value))
    }

    /// Like [`Self::instance`], but a null argument gives `None`
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument is neither null nor an instance of `T`
    pub fn optional_instance<T: Any + Send + Sync>(&self, index: usize) -> Result<Option<Arc<T>>, InstantiateErrorKind> {
        match self.value(index)? {
            Value::Null => Ok(None),
            _ => self.instance(index).map(Some),
        }
    }

    /// Views an instance argument as the trait object `I`
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument class registered no cast to `I`
    pub fn interface<I: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Result<Arc<I>, InstantiateErrorKind> {
        let value = self.value(index)?;
        value
            .as_instance()
            .and_then(|instance| instance.cast::<I>())
            .ok_or_else(|| mismatch(index, type_name::<I>(), value))
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument isn't a string
    pub fn str(&self, index: usize) -> Result<&str, InstantiateErrorKind> {
        let value = self.value(index)?;
        value.as_str().ok_or_else(|| mismatch(index, "string", value))
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument isn't an integer
    pub fn int(&self, index: usize) -> Result<i64, InstantiateErrorKind> {
        match self.value(index)? {
            Value::Int(value) => Ok(*value),
            value => Err(mismatch(index, "int", value)),
        }
    }

    /// Integers are widened
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument isn't a number
    #[allow(clippy::cast_precision_loss)]
    pub fn float(&self, index: usize) -> Result<f64, InstantiateErrorKind> {
        match self.value(index)? {
            Value::Float(value) => Ok(*value),
            Value::Int(value) => Ok(*value as f64),
            value => Err(mismatch(index, "float", value)),
        }
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::ArgumentType`] if the argument isn't a bool
    pub fn bool(&self, index: usize) -> Result<bool, InstantiateErrorKind> {
        match self.value(index)? {
            Value::Bool(value) => Ok(*value),
            value => Err(mismatch(index, "bool", value)),
        }
    }
}

fn mismatch(index: usize, expected: &'static str, actual: &Value) -> InstantiateErrorKind {
    InstantiateErrorKind::ArgumentType {
        position: index + 1,
        expected,
        actual: match actual {
            Value::Instance(instance) => instance.class().to_string(),
            value => value.kind().to_string(),
        },
    }
}
