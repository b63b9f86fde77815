//! Per-parameter injection descriptors.
//!
//! A descriptor list is positional: the descriptor at index `i` describes
//! constructor argument `i`. Each descriptor is either a bare identifier or a
//! qualified record narrowing the match with a name and/or a tag.
//!
//! ```
//! use bindery::injection::Injection;
//!
//! let injections = [
//!     Injection::tagged("Weapon", "throwable", false),
//!     Injection::tagged("Weapon", "throwable", true),
//! ];
//! assert_eq!(injections.len(), 2);
//! ```

use crate::identifier::{ServiceId, TagValue, Token, TypeKey};

/// Descriptor for one constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Injection {
    /// Resolve this identifier with no qualifier.
    Id(ServiceId),
    /// Resolve an identifier narrowed by a name and/or a tag.
    Qualified(QualifiedInjection),
}

/// Qualified injection record.
///
/// `service` is mandatory; a record without one is rejected when it is used
/// to annotate a class. `named` and `tagged` are independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualifiedInjection {
    pub service: Option<ServiceId>,
    pub named: Option<String>,
    pub tagged: Option<(String, TagValue)>,
}

impl QualifiedInjection {
    pub fn new(service: impl Into<ServiceId>) -> Self {
        Self {
            service: Some(service.into()),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.named = Some(name.into());
        self
    }

    pub fn tagged(mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.tagged = Some((key.into(), value.into()));
        self
    }
}

impl Injection {
    pub fn id(service: impl Into<ServiceId>) -> Self {
        Injection::Id(service.into())
    }

    /// Class reference to the concrete type `T`.
    pub fn class<T: ?Sized + 'static>() -> Self {
        Injection::Id(ServiceId::of::<T>())
    }

    pub fn named(service: impl Into<ServiceId>, name: impl Into<String>) -> Self {
        Injection::Qualified(QualifiedInjection::new(service).named(name))
    }

    pub fn tagged(
        service: impl Into<ServiceId>,
        key: impl Into<String>,
        value: impl Into<TagValue>,
    ) -> Self {
        Injection::Qualified(QualifiedInjection::new(service).tagged(key, value))
    }

    /// Identifier requested by this descriptor, if any.
    pub fn service(&self) -> Option<&ServiceId> {
        match self {
            Injection::Id(service) => Some(service),
            Injection::Qualified(qualified) => qualified.service.as_ref(),
        }
    }
}

impl From<ServiceId> for Injection {
    fn from(service: ServiceId) -> Self {
        Injection::Id(service)
    }
}

impl From<&str> for Injection {
    fn from(name: &str) -> Self {
        Injection::Id(name.into())
    }
}

impl From<String> for Injection {
    fn from(name: String) -> Self {
        Injection::Id(name.into())
    }
}

impl From<Token> for Injection {
    fn from(token: Token) -> Self {
        Injection::Id(token.into())
    }
}

impl From<&Token> for Injection {
    fn from(token: &Token) -> Self {
        Injection::Id(token.into())
    }
}

impl From<TypeKey> for Injection {
    fn from(key: TypeKey) -> Self {
        Injection::Id(key.into())
    }
}

impl From<QualifiedInjection> for Injection {
    fn from(qualified: QualifiedInjection) -> Self {
        Injection::Qualified(qualified)
    }
}
