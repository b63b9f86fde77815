//! Qualifier-aware dependency injection container.
//!
//! Public API:
//! - `bind::<T>(id)` followed by one of the `to_*` strategies: register how an
//!   identifier is satisfied, then refine it through the returned fluent handle
//! - `bind_self(class)`: bind a class under its own class identifier
//! - `try_get` / `try_get_named` / `try_get_tagged`: resolve an identifier,
//!   optionally narrowed by a qualifier (`get*` variants panic on error)
//! - `is_bound` / `unbind`: inspect and drop bindings
//!
//! An identifier may carry several bindings. A request picks the bindings
//! whose constraint its qualifiers satisfy (unconstrained bindings always
//! qualify) and expects exactly one.
//!
//! # Examples
//!
//! ```
//! use bindery::{injectable, Class, Container};
//!
//! struct Katana;
//! injectable!(Katana => Katana);
//!
//! let container = Container::new();
//! bindery::annotate(&Class::<Katana>::new(), Vec::<&'static str>::new()).unwrap();
//! container.bind("Katana").to(Class::<Katana>::new()).unwrap().in_singleton_scope();
//!
//! let a = container.get::<Katana>("Katana");
//! let b = container.get::<Katana>("Katana");
//! assert!(std::rc::Rc::ptr_eq(&a, &b));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::binding::{Binding, BindingInWhen, BindingKind, BindingWhen, Target};
use crate::error::Error;
use crate::factory::AutoFactory;
use crate::identifier::{ServiceId, TagValue};
use crate::injectable::{Arguments, Class};
use crate::instance::Instance;
use crate::metadata;
use crate::resolve_guard::ResolveGuard;
use crate::runtime::{Shared, Store, Value, WeakShared};
use crate::scope::Scope;

#[cfg(feature = "tracing")]
use tracing::{debug, info, trace};

static NEXT_BINDING: AtomicU64 = AtomicU64::new(1);

/// Container-wide policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerOptions {
    /// Scope given to new class and dynamic-value bindings.
    pub default_scope: Scope,
    /// Refuse a second binding for an identifier that is already bound.
    pub forbid_rebinding: bool,
}

struct ContainerInner {
    options: ContainerOptions,
    bindings: Store<HashMap<ServiceId, Vec<Shared<Store<Binding>>>>>,
}

/// The DI container. Cloning yields another handle to the same bindings.
#[derive(Clone)]
pub struct Container {
    inner: Shared<ContainerInner>,
}

/// Non-owning handle to a [`Container`].
#[derive(Clone)]
pub struct WeakContainer {
    inner: WeakShared<ContainerInner>,
}

impl WeakContainer {
    pub fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

/// What dynamic values, factories and providers receive when they run.
pub struct Context<'a> {
    container: &'a Container,
    target: &'a Target,
}

impl<'a> Context<'a> {
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The request being served.
    pub fn target(&self) -> &'a Target {
        self.target
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.inner.bindings.borrow();
        f.debug_struct("Container")
            .field("options", &self.inner.options)
            .field("services", &bindings.len())
            .field("bindings", &bindings.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        #[cfg(feature = "tracing")]
        debug!("Creating new container with {:?}", options);

        Self {
            inner: Shared::new(ContainerInner {
                options,
                bindings: Store::new(HashMap::new()),
            }),
        }
    }

    pub fn options(&self) -> ContainerOptions {
        self.inner.options
    }

    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            inner: Shared::downgrade(&self.inner),
        }
    }

    /// Starts a binding for `service`, exposed as `T` on resolution.
    pub fn bind<T: ?Sized + 'static>(&self, service: impl Into<ServiceId>) -> BindingTo<T> {
        BindingTo {
            container: self.clone(),
            service: service.into(),
            _marker: PhantomData,
        }
    }

    /// Binds `class` under its own class identifier.
    pub fn bind_self<T: ?Sized + 'static>(&self, class: Class<T>) -> Result<BindingInWhen, Error> {
        self.bind::<T>(class.id()).to(class)
    }

    pub fn is_bound(&self, service: impl Into<ServiceId>) -> bool {
        let service = service.into();
        self.inner
            .bindings
            .borrow()
            .get(&service)
            .is_some_and(|bindings| !bindings.is_empty())
    }

    /// Drops every binding of `service`.
    pub fn unbind(&self, service: impl Into<ServiceId>) -> Result<(), Error> {
        let service = service.into();
        let removed = self.inner.bindings.borrow_mut().remove(&service);

        match removed {
            Some(bindings) if !bindings.is_empty() => {
                #[cfg(feature = "tracing")]
                info!("Unbound {} ({} bindings)", service, bindings.len());
                Ok(())
            }
            _ => Err(Error::service_not_bound(&service.to_string())),
        }
    }

    fn add_binding(
        &self,
        service: ServiceId,
        kind: BindingKind,
    ) -> Result<Shared<Store<Binding>>, Error> {
        let mut bindings = self.inner.bindings.borrow_mut();
        let entry = bindings.entry(service.clone()).or_default();

        if self.inner.options.forbid_rebinding && !entry.is_empty() {
            return Err(Error::duplicate_binding(&service.to_string()));
        }

        #[cfg(feature = "tracing")]
        info!("Binding {} to {}", service, kind.label());

        let binding = Shared::new(Store::new(Binding {
            key: NEXT_BINDING.fetch_add(1, Ordering::Relaxed),
            service,
            kind,
            scope: self.inner.options.default_scope,
            constraint: None,
            cache: None,
        }));
        entry.push(binding.clone());

        Ok(binding)
    }

    fn select(&self, target: &Target) -> Result<Shared<Store<Binding>>, Error> {
        let bindings = self.inner.bindings.borrow();
        let mut candidates: Vec<Shared<Store<Binding>>> = bindings
            .get(&target.service)
            .into_iter()
            .flatten()
            .filter(|binding| binding.borrow().matches(target))
            .cloned()
            .collect();

        match candidates.len() {
            0 => Err(Error::service_not_bound(&target.to_string())),
            1 => Ok(candidates.remove(0)),
            count => Err(Error::ambiguous_match(&target.to_string(), count)),
        }
    }

    pub(crate) fn resolve_value(&self, target: &Target) -> Result<Value, Error> {
        let binding = self.select(target)?;
        let (key, kind, scope, cached) = {
            let b = binding.borrow();
            (b.key, b.kind.clone(), b.scope, b.cache.clone())
        };

        if let Some(value) = cached {
            #[cfg(feature = "tracing")]
            trace!("Serving cached singleton for {}", target);
            return Ok(value);
        }

        let _guard = ResolveGuard::push(key, &target.to_string())?;

        #[cfg(feature = "tracing")]
        trace!("Resolving {} via {} binding", target, kind.label());

        let context = Context {
            container: self,
            target,
        };

        let value = match kind {
            BindingKind::Constructor(value)
            | BindingKind::ConstantValue(value)
            | BindingKind::Function(value)
            | BindingKind::AutoFactory(value) => return Ok(value),
            BindingKind::Class { class, construct } => {
                let metadata = metadata::lookup(class)
                    .filter(|metadata| metadata.injectable)
                    .ok_or_else(|| Error::missing_annotation(class.name()))?;

                let mut values = Vec::with_capacity(metadata.parameters.len());
                for (index, parameter) in metadata.parameters.iter().enumerate() {
                    let service = parameter
                        .service
                        .clone()
                        .ok_or_else(|| Error::missing_argument(class.name(), index))?;
                    let dependency = Target {
                        service,
                        named: parameter.named.clone(),
                        tagged: parameter.tagged.clone(),
                    };
                    values.push(self.resolve_value(&dependency)?);
                }

                let mut args = Arguments::resolved(class.name(), values);
                construct(&mut args)?
            }
            BindingKind::DynamicValue(produce)
            | BindingKind::Factory(produce)
            | BindingKind::Provider(produce) => produce(&context)?,
        };

        if scope.is_singleton() {
            binding.borrow_mut().cache = Some(value.clone());
        }

        Ok(value)
    }

    /// Resolves an arbitrary request.
    pub fn try_resolve<T: ?Sized + 'static>(&self, target: &Target) -> Result<Shared<T>, Error> {
        let value = self.resolve_value(target)?;
        Instance::<T>::from_value(&value)
    }

    pub fn try_get<T: ?Sized + 'static>(
        &self,
        service: impl Into<ServiceId>,
    ) -> Result<Shared<T>, Error> {
        self.try_resolve(&Target::new(service))
    }

    pub fn try_get_named<T: ?Sized + 'static>(
        &self,
        service: impl Into<ServiceId>,
        name: impl Into<String>,
    ) -> Result<Shared<T>, Error> {
        self.try_resolve(&Target::new(service).named(name))
    }

    pub fn try_get_tagged<T: ?Sized + 'static>(
        &self,
        service: impl Into<ServiceId>,
        key: impl Into<String>,
        value: impl Into<TagValue>,
    ) -> Result<Shared<T>, Error> {
        self.try_resolve(&Target::new(service).tagged(key, value))
    }

    /// Panicking variant of [`try_get`](Self::try_get).
    pub fn get<T: ?Sized + 'static>(&self, service: impl Into<ServiceId>) -> Shared<T> {
        self.try_get(service).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Panicking variant of [`try_get_named`](Self::try_get_named).
    pub fn get_named<T: ?Sized + 'static>(
        &self,
        service: impl Into<ServiceId>,
        name: impl Into<String>,
    ) -> Shared<T> {
        self.try_get_named(service, name)
            .unwrap_or_else(|err| panic!("{}", err))
    }

    /// Panicking variant of [`try_get_tagged`](Self::try_get_tagged).
    pub fn get_tagged<T: ?Sized + 'static>(
        &self,
        service: impl Into<ServiceId>,
        key: impl Into<String>,
        value: impl Into<TagValue>,
    ) -> Shared<T> {
        self.try_get_tagged(service, key, value)
            .unwrap_or_else(|err| panic!("{}", err))
    }
}

/// First half of a binding: the identifier and the exposed type `T`.
pub struct BindingTo<T: ?Sized + 'static> {
    container: Container,
    service: ServiceId,
    _marker: PhantomData<fn() -> Shared<T>>,
}

impl<T: ?Sized + 'static> BindingTo<T> {
    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// Instantiates `class` on resolution, injecting its annotated parameters.
    pub fn to(self, class: Class<T>) -> Result<BindingInWhen, Error> {
        let kind = BindingKind::Class {
            class: class.key(),
            construct: Shared::new(move |args: &mut Arguments| {
                class
                    .construct(args)
                    .map(|value| Instance::new(value).into_value())
            }),
        };
        self.container
            .add_binding(self.service, kind)
            .map(BindingInWhen::new)
    }

    /// Resolves to the same value every time.
    pub fn to_constant_value(self, value: Shared<T>) -> Result<BindingWhen, Error> {
        let kind = BindingKind::ConstantValue(Instance::new(value).into_value());
        self.container
            .add_binding(self.service, kind)
            .map(BindingWhen::new)
    }

    /// Computes the value with `produce` on each resolution (or once, in singleton scope).
    pub fn to_dynamic_value<F>(self, produce: F) -> Result<BindingInWhen, Error>
    where
        F: Fn(&Context<'_>) -> Result<Shared<T>, Error> + 'static,
    {
        let kind = BindingKind::DynamicValue(Shared::new(move |context: &Context<'_>| {
            produce(context).map(|value| Instance::new(value).into_value())
        }));
        self.container
            .add_binding(self.service, kind)
            .map(BindingInWhen::new)
    }

    /// Resolves to the function value itself.
    pub fn to_function(self, function: Shared<T>) -> Result<BindingWhen, Error> {
        let kind = BindingKind::Function(Instance::new(function).into_value());
        self.container
            .add_binding(self.service, kind)
            .map(BindingWhen::new)
    }

    /// Resolves to the factory `build` returns for the current request.
    pub fn to_factory<F>(self, build: F) -> Result<BindingWhen, Error>
    where
        F: Fn(&Context<'_>) -> Shared<T> + 'static,
    {
        let kind = BindingKind::Factory(Shared::new(move |context: &Context<'_>| {
            Ok(Instance::new(build(context)).into_value())
        }));
        self.container
            .add_binding(self.service, kind)
            .map(BindingWhen::new)
    }

    /// Resolves to the provider `build` returns for the current request.
    pub fn to_provider<F>(self, build: F) -> Result<BindingWhen, Error>
    where
        F: Fn(&Context<'_>) -> Shared<T> + 'static,
    {
        let kind = BindingKind::Provider(Shared::new(move |context: &Context<'_>| {
            Ok(Instance::new(build(context)).into_value())
        }));
        self.container
            .add_binding(self.service, kind)
            .map(BindingWhen::new)
    }
}

impl<U: ?Sized + 'static> BindingTo<Class<U>> {
    /// Resolves to the class handle itself rather than an instance of it.
    pub fn to_constructor(self, class: Class<U>) -> Result<BindingWhen, Error> {
        let kind = BindingKind::Constructor(Instance::new(Shared::new(class)).into_value());
        self.container
            .add_binding(self.service, kind)
            .map(BindingWhen::new)
    }
}

impl<U: ?Sized + 'static> BindingTo<AutoFactory<U>> {
    /// Resolves to a factory that resolves `target` each time it is called.
    pub fn to_auto_factory(self, target: impl Into<ServiceId>) -> Result<BindingWhen, Error> {
        let factory = AutoFactory::<U>::new(&self.container, target.into());
        let kind = BindingKind::AutoFactory(Instance::new(Shared::new(factory)).into_value());
        self.container
            .add_binding(self.service, kind)
            .map(BindingWhen::new)
    }
}
