//! Constructible classes and their resolved arguments.
//!
//! A "class" in bindery is a concrete type implementing [`Injectable`],
//! wrapped in a [`Class<T>`] handle that the container can bind and
//! instantiate. The handle carries the concrete type's identity (which keys
//! its injection metadata) and a constructor producing `Shared<T>`, where `T`
//! is the type the class is exposed as.

use std::fmt;

use crate::error::Error;
use crate::identifier::{ServiceId, TypeKey};
use crate::instance::Instance;
use crate::runtime::{Shared, Value};

/// A type the container can construct from resolved arguments.
///
/// Arguments arrive in parameter order, as recorded by
/// [`annotate`](crate::annotate::annotate). The [`injectable!`](crate::injectable!)
/// macro implements this trait for plain structs.
pub trait Injectable: Sized + 'static {
    fn construct(args: &mut Arguments) -> Result<Self, Error>;
}

/// Resolved constructor arguments, consumed front to back.
pub struct Arguments {
    class: &'static str,
    values: Vec<Value>,
    position: usize,
}

impl Arguments {
    /// Empty argument list, for instantiating a class by hand.
    pub fn new() -> Self {
        Self::resolved("<manual>", Vec::new())
    }

    pub(crate) fn resolved(class: &'static str, values: Vec<Value>) -> Self {
        Self {
            class,
            values,
            position: 0,
        }
    }

    /// Appends an argument, builder style.
    pub fn with<T: ?Sized + 'static>(mut self, value: Shared<T>) -> Self {
        self.push(value);
        self
    }

    pub fn push<T: ?Sized + 'static>(&mut self, value: Shared<T>) {
        self.values.push(Instance::new(value).into_value());
    }

    /// Takes the next argument as `Shared<T>`.
    pub fn next<T: ?Sized + 'static>(&mut self) -> Result<Shared<T>, Error> {
        let index = self.position;
        let value = self
            .values
            .get(index)
            .ok_or_else(|| Error::missing_argument(self.class, index))?;
        let value = Instance::<T>::from_value(value)?;
        self.position += 1;
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arguments not yet taken by [`next`](Self::next).
    pub fn remaining(&self) -> usize {
        self.values.len() - self.position
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::new()
    }
}

type Constructor<T> = Shared<dyn Fn(&mut Arguments) -> Result<Shared<T>, Error>>;

/// Handle to a constructible class, exposed as service type `T`.
pub struct Class<T: ?Sized + 'static> {
    key: TypeKey,
    constructor: Constructor<T>,
}

impl<C: Injectable> Class<C> {
    pub fn new() -> Self {
        Self {
            key: TypeKey::of::<C>(),
            constructor: Shared::new(|args: &mut Arguments| C::construct(args).map(Shared::new)),
        }
    }
}

impl<C: Injectable> Default for Class<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> Class<T> {
    /// Identity of the concrete type behind this handle.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Class reference identifier, as used by `register_self`.
    pub fn id(&self) -> ServiceId {
        ServiceId::Type(self.key)
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Re-exposes the class as another service type, typically a trait object.
    ///
    /// ```
    /// use bindery::{injectable, Class, Shared};
    ///
    /// trait Weapon {}
    /// struct Katana;
    /// impl Weapon for Katana {}
    /// injectable!(Katana => Katana);
    ///
    /// let weapon = Class::<Katana>::new().upcast(|k| k as Shared<dyn Weapon>);
    /// assert!(weapon.name().ends_with("Katana"));
    /// ```
    pub fn upcast<U: ?Sized + 'static>(self, cast: fn(Shared<T>) -> Shared<U>) -> Class<U> {
        let constructor = self.constructor;
        Class {
            key: self.key,
            constructor: Shared::new(move |args: &mut Arguments| (constructor)(args).map(cast)),
        }
    }

    /// Builds an instance from explicitly supplied arguments.
    pub fn instantiate(&self, mut args: Arguments) -> Result<Shared<T>, Error> {
        (self.constructor)(&mut args)
    }

    pub(crate) fn construct(&self, args: &mut Arguments) -> Result<Shared<T>, Error> {
        (self.constructor)(args)
    }
}

impl<T: ?Sized + 'static> Clone for Class<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            constructor: self.constructor.clone(),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Class<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("class", &self.key.name())
            .field("exposed_as", &std::any::type_name::<T>())
            .finish()
    }
}
