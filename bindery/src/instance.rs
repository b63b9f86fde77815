use std::any::Any;

use crate::error::Error;
use crate::runtime::{Shared, Value};

/// Sized envelope around a `Shared<T>` so that unsized service types
/// (`dyn Trait`) can be stored behind `dyn Any`.
pub struct Instance<T: ?Sized + 'static> {
    pub value: Shared<T>,
}

impl<T: ?Sized + 'static> Instance<T> {
    pub fn new(value: Shared<T>) -> Self {
        Self { value }
    }

    /// Erases the instance into a container [`Value`].
    pub fn into_value(self) -> Value {
        Shared::new(self) as Shared<dyn Any>
    }

    /// Recovers a `Shared<T>` from an erased value.
    pub fn from_value(value: &Value) -> Result<Shared<T>, Error> {
        value
            .downcast_ref::<Instance<T>>()
            .map(|instance| instance.value.clone())
            .ok_or_else(|| Error::type_mismatch(std::any::type_name::<T>()))
    }
}

impl<T: ?Sized + 'static> Clone for Instance<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}
