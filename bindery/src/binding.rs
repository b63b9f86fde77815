//! Bindings, their constraints, and the fluent syntax used to configure them.
//!
//! A binding is created by one of the `BindingTo::to_*` calls on the
//! [`Container`](crate::Container). The call returns a fluent handle that
//! edits the stored binding in place:
//!
//! - [`BindingInWhen`]: scope and qualifier constraints, for bindings that
//!   instantiate something on resolution (classes, dynamic values).
//! - [`BindingWhen`]: qualifier constraints only, for bindings whose value is
//!   fixed or caller-built.

use std::fmt;

use crate::container::Context;
use crate::error::Error;
use crate::identifier::{ServiceId, TagValue, TypeKey};
use crate::injectable::Arguments;
use crate::runtime::{Shared, Store, Value};
use crate::scope::Scope;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

pub(crate) type ValueFn = Shared<dyn Fn(&Context<'_>) -> Result<Value, Error>>;
pub(crate) type ClassFn = Shared<dyn Fn(&mut Arguments) -> Result<Value, Error>>;

/// How a binding produces its value.
#[derive(Clone)]
pub(crate) enum BindingKind {
    Class { class: TypeKey, construct: ClassFn },
    Constructor(Value),
    ConstantValue(Value),
    DynamicValue(ValueFn),
    Function(Value),
    AutoFactory(Value),
    Factory(ValueFn),
    Provider(ValueFn),
}

impl BindingKind {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            BindingKind::Class { .. } => "class",
            BindingKind::Constructor(_) => "constructor",
            BindingKind::ConstantValue(_) => "constant value",
            BindingKind::DynamicValue(_) => "dynamic value",
            BindingKind::Function(_) => "function",
            BindingKind::AutoFactory(_) => "auto factory",
            BindingKind::Factory(_) => "factory",
            BindingKind::Provider(_) => "provider",
        }
    }
}

/// Qualifier condition a request must satisfy to use a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Named(String),
    Tagged(String, TagValue),
}

impl Constraint {
    pub fn matches(&self, target: &Target) -> bool {
        match self {
            Constraint::Named(name) => target.named.as_deref() == Some(name.as_str()),
            Constraint::Tagged(key, value) => target
                .tagged
                .as_ref()
                .is_some_and(|(k, v)| k == key && v == value),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Named(name) => write!(f, "named: {}", name),
            Constraint::Tagged(key, value) => write!(f, "tagged: {}={}", key, value),
        }
    }
}

/// A resolution request: the identifier plus the qualifiers of the
/// injection site asking for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub service: ServiceId,
    pub named: Option<String>,
    pub tagged: Option<(String, TagValue)>,
}

impl Target {
    pub fn new(service: impl Into<ServiceId>) -> Self {
        Self {
            service: service.into(),
            named: None,
            tagged: None,
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

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.service)?;
        if let Some(name) = &self.named {
            write!(f, " (named: {})", name)?;
        }
        if let Some((key, value)) = &self.tagged {
            write!(f, " (tagged: {}={})", key, value)?;
        }
        Ok(())
    }
}

pub(crate) struct Binding {
    pub(crate) key: u64,
    pub(crate) service: ServiceId,
    pub(crate) kind: BindingKind,
    pub(crate) scope: Scope,
    pub(crate) constraint: Option<Constraint>,
    pub(crate) cache: Option<Value>,
}

impl Binding {
    pub(crate) fn matches(&self, target: &Target) -> bool {
        self.constraint
            .as_ref()
            .is_none_or(|constraint| constraint.matches(target))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("service", &self.service)
            .field("kind", &self.kind.label())
            .field("scope", &self.scope)
            .field("constraint", &self.constraint)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

/// Fluent handle for qualifier constraints.
#[derive(Debug, Clone)]
pub struct BindingWhen {
    binding: Shared<Store<Binding>>,
}

impl BindingWhen {
    pub(crate) fn new(binding: Shared<Store<Binding>>) -> Self {
        Self { binding }
    }

    fn set_constraint(&self, constraint: Constraint) {
        let mut binding = self.binding.borrow_mut();

        #[cfg(feature = "tracing")]
        if let Some(previous) = &binding.constraint {
            warn!(
                "Replacing constraint ({}) on {} with ({})",
                previous, binding.service, constraint
            );
        } else {
            debug!("Constraining {} binding ({})", binding.service, constraint);
        }

        binding.constraint = Some(constraint);
    }

    /// Only inject into targets carrying this name. Replaces any earlier constraint.
    pub fn when_target_named(&self, name: impl Into<String>) -> &Self {
        self.set_constraint(Constraint::Named(name.into()));
        self
    }

    /// Only inject into targets carrying this tag. Replaces any earlier constraint.
    pub fn when_target_tagged(&self, key: impl Into<String>, value: impl Into<TagValue>) -> &Self {
        self.set_constraint(Constraint::Tagged(key.into(), value.into()));
        self
    }

    pub fn constraint(&self) -> Option<Constraint> {
        self.binding.borrow().constraint.clone()
    }

    pub fn service(&self) -> ServiceId {
        self.binding.borrow().service.clone()
    }
}

/// Fluent handle for scope and qualifier constraints.
#[derive(Debug, Clone)]
pub struct BindingInWhen {
    when: BindingWhen,
}

impl BindingInWhen {
    pub(crate) fn new(binding: Shared<Store<Binding>>) -> Self {
        Self {
            when: BindingWhen::new(binding),
        }
    }

    fn set_scope(&self, scope: Scope) {
        let mut binding = self.when.binding.borrow_mut();
        binding.scope = scope;
        binding.cache = None;

        #[cfg(feature = "tracing")]
        debug!("Scoping {} binding as {}", binding.service, scope);
    }

    pub fn in_singleton_scope(&self) -> &Self {
        self.set_scope(Scope::Singleton);
        self
    }

    pub fn in_transient_scope(&self) -> &Self {
        self.set_scope(Scope::Transient);
        self
    }

    pub fn when_target_named(&self, name: impl Into<String>) -> &Self {
        self.when.when_target_named(name);
        self
    }

    pub fn when_target_tagged(&self, key: impl Into<String>, value: impl Into<TagValue>) -> &Self {
        self.when.when_target_tagged(key, value);
        self
    }

    pub fn scope(&self) -> Scope {
        self.when.binding.borrow().scope
    }

    pub fn constraint(&self) -> Option<Constraint> {
        self.when.constraint()
    }

    pub fn service(&self) -> ServiceId {
        self.when.service()
    }
}
