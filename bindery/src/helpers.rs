//! Registrar factories: one-call registration over a [`Container`].
//!
//! Each factory captures a container handle and fixes a binding strategy.
//! `bind(id)` then starts a [`Registration`] that collects the optional
//! parameter descriptors and the optional constraint; the terminal call
//! (`apply` for class-bearing strategies, `to` for value strategies) performs
//! exactly one bind and then runs the constraint on the fluent handle.
//!
//! | Factory | Terminal | Fluent handle |
//! |---|---|---|
//! | [`register`] | `apply(class)` | [`BindingInWhen`] |
//! | [`register_self`] | `apply(class)` | [`BindingInWhen`] |
//! | [`register_constructor`] | `apply(class)` | [`BindingWhen`] |
//! | [`register_constant_value`] | `to(value)` | [`BindingWhen`] |
//! | [`register_dynamic_value`] | `to(produce)` | [`BindingInWhen`] |
//! | [`register_function`] | `to(function)` | [`BindingWhen`] |
//! | [`register_auto_factory`] | `to::<T>(target)` | [`BindingWhen`] |
//! | [`register_factory`] | `to(build)` | [`BindingWhen`] |
//! | [`register_provider`] | `to(build)` | [`BindingWhen`] |
//!
//! Only `register` and `register_self` annotate the class.
//!
//! # Examples
//!
//! ```
//! use bindery::helpers::{register, register_self};
//! use bindery::{injectable, Class, Container, Shared};
//!
//! struct Katana;
//! struct Ninja {
//!     katana: Shared<Katana>,
//! }
//!
//! injectable!(Katana => Katana);
//! injectable!(Ninja { katana: Katana });
//!
//! let container = Container::new();
//! register_self(&container)
//!     .bind()
//!     .when(|b| {
//!         b.in_singleton_scope();
//!     })
//!     .apply(Class::<Katana>::new())
//!     .unwrap();
//! register(&container)
//!     .bind("Ninja")
//!     .inject([Class::<Katana>::new().id()])
//!     .apply(Class::<Ninja>::new())
//!     .unwrap();
//!
//! let ninja = container.get::<Ninja>("Ninja");
//! # let _ = &ninja.katana;
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::annotate::Annotation;
use crate::binding::{BindingInWhen, BindingWhen};
use crate::container::{Container, Context};
use crate::error::Error;
use crate::factory::AutoFactory;
use crate::identifier::ServiceId;
use crate::injectable::Class;
use crate::injection::Injection;
use crate::runtime::Shared;

pub use crate::annotate::annotate;

#[cfg(feature = "tracing")]
use tracing::debug;

/// A binding strategy and the fluent handle its bind produces.
pub trait Strategy {
    type Syntax;
}

macro_rules! strategies {
    ($($(#[$meta:meta])* $name:ident => $syntax:ty;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $name;

            impl Strategy for $name {
                type Syntax = $syntax;
            }
        )*
    };
}

strategies! {
    /// Bind an identifier to an annotated class.
    ToClass => BindingInWhen;
    /// Bind a class under its own class identifier.
    ToSelf => BindingInWhen;
    /// Bind an identifier to the class handle itself.
    ToConstructor => BindingWhen;
    ToConstantValue => BindingWhen;
    ToDynamicValue => BindingInWhen;
    ToFunction => BindingWhen;
    ToAutoFactory => BindingWhen;
    ToFactory => BindingWhen;
    ToProvider => BindingWhen;
}

type ConstraintFn<'a, S> = Box<dyn FnOnce(&<S as Strategy>::Syntax) + 'a>;

/// Reusable registration entry point bound to one container and one strategy.
pub struct Registrar<S> {
    container: Container,
    _strategy: PhantomData<S>,
}

impl<S> Clone for Registrar<S> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            _strategy: PhantomData,
        }
    }
}

impl<S> fmt::Debug for Registrar<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar")
            .field("strategy", &std::any::type_name::<S>())
            .finish()
    }
}

impl<S: Strategy> Registrar<S> {
    fn new(container: &Container) -> Self {
        Self {
            container: container.clone(),
            _strategy: PhantomData,
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }
}

macro_rules! bind_by_id {
    ($($strategy:ty),*) => {
        $(
            impl Registrar<$strategy> {
                /// Starts a registration for `service`.
                pub fn bind<'a>(
                    &self,
                    service: impl Into<ServiceId>,
                ) -> Registration<'a, $strategy> {
                    Registration {
                        container: self.container.clone(),
                        service: service.into(),
                        injections: Vec::new(),
                        constraint: None,
                    }
                }
            }
        )*
    };
}

bind_by_id!(
    ToClass,
    ToConstructor,
    ToConstantValue,
    ToDynamicValue,
    ToFunction,
    ToAutoFactory,
    ToFactory,
    ToProvider
);

impl Registrar<ToSelf> {
    /// Starts a registration keyed by the class it is applied to.
    pub fn bind<'a>(&self) -> SelfRegistration<'a> {
        SelfRegistration {
            container: self.container.clone(),
            injections: Vec::new(),
            constraint: None,
        }
    }
}

/// Registrar binding an identifier to an annotated class.
pub fn register(container: &Container) -> Registrar<ToClass> {
    Registrar::new(container)
}

/// Registrar binding a class under its own class identifier.
pub fn register_self(container: &Container) -> Registrar<ToSelf> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a class handle, left unannotated.
pub fn register_constructor(container: &Container) -> Registrar<ToConstructor> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a fixed value.
pub fn register_constant_value(container: &Container) -> Registrar<ToConstantValue> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a value computed on resolution.
pub fn register_dynamic_value(container: &Container) -> Registrar<ToDynamicValue> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a function value.
pub fn register_function(container: &Container) -> Registrar<ToFunction> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a factory resolving another identifier.
pub fn register_auto_factory(container: &Container) -> Registrar<ToAutoFactory> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a caller-built factory.
pub fn register_factory(container: &Container) -> Registrar<ToFactory> {
    Registrar::new(container)
}

/// Registrar binding an identifier to a caller-built asynchronous provider.
pub fn register_provider(container: &Container) -> Registrar<ToProvider> {
    Registrar::new(container)
}

/// A pending registration under an explicit identifier.
pub struct Registration<'a, S: Strategy> {
    container: Container,
    service: ServiceId,
    injections: Vec<Injection>,
    constraint: Option<ConstraintFn<'a, S>>,
}

/// A pending registration keyed by the class it is applied to.
pub struct SelfRegistration<'a> {
    container: Container,
    injections: Vec<Injection>,
    constraint: Option<ConstraintFn<'a, ToSelf>>,
}

impl<S: Strategy> fmt::Debug for Registration<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("service", &self.service)
            .field("injections", &self.injections)
            .field("constrained", &self.constraint.is_some())
            .finish()
    }
}

impl fmt::Debug for SelfRegistration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfRegistration")
            .field("injections", &self.injections)
            .field("constrained", &self.constraint.is_some())
            .finish()
    }
}

fn constrain<S: Strategy>(syntax: S::Syntax, constraint: Option<ConstraintFn<'_, S>>) -> S::Syntax {
    if let Some(constraint) = constraint {
        constraint(&syntax);
    }
    syntax
}

fn bind_class<'a, S, T>(
    container: &Container,
    service: ServiceId,
    injections: Vec<Injection>,
    constraint: Option<ConstraintFn<'a, S>>,
    class: Class<T>,
) -> Result<Class<T>, Error>
where
    S: Strategy<Syntax = BindingInWhen>,
    T: ?Sized + 'static,
{
    // Metadata is only written once the bind has succeeded.
    let annotation = Annotation::prepare(&class, injections)?;

    #[cfg(feature = "tracing")]
    debug!("Registering class {} as {}", class.name(), service);

    let syntax = container.bind::<T>(service).to(class.clone())?;
    annotation.record();
    constrain::<S>(syntax, constraint);
    Ok(class)
}

impl<'a, S: Strategy> Registration<'a, S> {
    pub fn service(&self) -> &ServiceId {
        &self.service
    }

    /// Runs `constraint` on the fluent handle right after binding.
    pub fn when<F>(mut self, constraint: F) -> Self
    where
        F: FnOnce(&S::Syntax) + 'a,
    {
        self.constraint = Some(Box::new(constraint));
        self
    }
}

impl<'a> Registration<'a, ToClass> {
    /// Parameter descriptors recorded on the class, one per constructor argument.
    pub fn inject<I>(mut self, injections: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Injection>,
    {
        self.injections = injections.into_iter().map(Into::into).collect();
        self
    }

    /// Annotates `class`, binds it and hands it back.
    pub fn apply<T: ?Sized + 'static>(self, class: Class<T>) -> Result<Class<T>, Error> {
        bind_class::<ToClass, T>(
            &self.container,
            self.service,
            self.injections,
            self.constraint,
            class,
        )
    }
}

impl<'a> SelfRegistration<'a> {
    /// Parameter descriptors recorded on the class, one per constructor argument.
    pub fn inject<I>(mut self, injections: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Injection>,
    {
        self.injections = injections.into_iter().map(Into::into).collect();
        self
    }

    /// Runs `constraint` on the fluent handle right after binding.
    pub fn when<F>(mut self, constraint: F) -> Self
    where
        F: FnOnce(&BindingInWhen) + 'a,
    {
        self.constraint = Some(Box::new(constraint));
        self
    }

    /// Annotates `class`, binds it under its own identifier and hands it back.
    pub fn apply<T: ?Sized + 'static>(self, class: Class<T>) -> Result<Class<T>, Error> {
        let service = class.id();
        bind_class::<ToSelf, T>(
            &self.container,
            service,
            self.injections,
            self.constraint,
            class,
        )
    }
}

impl Registration<'_, ToConstructor> {
    /// Binds the class handle itself and hands it back. No annotation happens.
    pub fn apply<T: ?Sized + 'static>(self, class: Class<T>) -> Result<Class<T>, Error> {
        #[cfg(feature = "tracing")]
        debug!("Registering constructor {} as {}", class.name(), self.service);

        let syntax = self
            .container
            .bind::<Class<T>>(self.service)
            .to_constructor(class.clone())?;
        constrain::<ToConstructor>(syntax, self.constraint);
        Ok(class)
    }
}

impl Registration<'_, ToConstantValue> {
    /// Binds `value`; every resolution returns the same pointer.
    pub fn to<T: ?Sized + 'static>(self, value: Shared<T>) -> Result<BindingWhen, Error> {
        let syntax = self
            .container
            .bind::<T>(self.service)
            .to_constant_value(value)?;
        Ok(constrain::<ToConstantValue>(syntax, self.constraint))
    }
}

impl Registration<'_, ToDynamicValue> {
    /// Binds `produce`, run on each resolution (once in singleton scope).
    pub fn to<T, F>(self, produce: F) -> Result<BindingInWhen, Error>
    where
        T: ?Sized + 'static,
        F: Fn(&Context<'_>) -> Result<Shared<T>, Error> + 'static,
    {
        let syntax = self
            .container
            .bind::<T>(self.service)
            .to_dynamic_value(produce)?;
        Ok(constrain::<ToDynamicValue>(syntax, self.constraint))
    }
}

impl Registration<'_, ToFunction> {
    /// Binds the function value itself.
    pub fn to<F: ?Sized + 'static>(self, function: Shared<F>) -> Result<BindingWhen, Error> {
        let syntax = self.container.bind::<F>(self.service).to_function(function)?;
        Ok(constrain::<ToFunction>(syntax, self.constraint))
    }
}

impl Registration<'_, ToAutoFactory> {
    /// Binds a factory resolving `target` as a `T` on every call.
    pub fn to<T: ?Sized + 'static>(
        self,
        target: impl Into<ServiceId>,
    ) -> Result<BindingWhen, Error> {
        let syntax = self
            .container
            .bind::<AutoFactory<T>>(self.service)
            .to_auto_factory(target)?;
        Ok(constrain::<ToAutoFactory>(syntax, self.constraint))
    }
}

impl Registration<'_, ToFactory> {
    /// Binds the factory `build` returns for each request.
    pub fn to<F, B>(self, build: B) -> Result<BindingWhen, Error>
    where
        F: ?Sized + 'static,
        B: Fn(&Context<'_>) -> Shared<F> + 'static,
    {
        let syntax = self.container.bind::<F>(self.service).to_factory(build)?;
        Ok(constrain::<ToFactory>(syntax, self.constraint))
    }
}

impl Registration<'_, ToProvider> {
    /// Binds the provider `build` returns for each request. Nothing is awaited here.
    pub fn to<P, B>(self, build: B) -> Result<BindingWhen, Error>
    where
        P: ?Sized + 'static,
        B: Fn(&Context<'_>) -> Shared<P> + 'static,
    {
        let syntax = self.container.bind::<P>(self.service).to_provider(build)?;
        Ok(constrain::<ToProvider>(syntax, self.constraint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Constraint;
    use crate::error::ErrorKind;
    use crate::factory::{FactoryFn, ProviderFn, ProviderFuture};
    use crate::injectable::{Arguments, Injectable};
    use crate::injection::QualifiedInjection;
    use crate::scope::Scope;
    use std::cell::Cell;

    trait Weapon {
        fn name(&self) -> &'static str;
    }

    struct Katana {
        durability: Cell<u32>,
    }

    struct Shuriken {
        durability: Cell<u32>,
    }

    impl Katana {
        fn hit(&self) {
            self.durability.set(self.durability.get() - 10);
        }
    }

    impl Shuriken {
        fn hit(&self) {
            self.durability.set(self.durability.get() - 10);
        }
    }

    impl Weapon for Katana {
        fn name(&self) -> &'static str {
            "Katana"
        }
    }

    impl Weapon for Shuriken {
        fn name(&self) -> &'static str {
            "Shuriken"
        }
    }

    impl Injectable for Katana {
        fn construct(_args: &mut Arguments) -> Result<Self, Error> {
            Ok(Katana {
                durability: Cell::new(100),
            })
        }
    }

    impl Injectable for Shuriken {
        fn construct(_args: &mut Arguments) -> Result<Self, Error> {
            Ok(Shuriken {
                durability: Cell::new(100),
            })
        }
    }

    // Class metadata is process-wide; tests annotating differently get their own type.
    macro_rules! warriors {
        ($($name:ident { $first:ident: $a:ty, $second:ident: $b:ty }),* $(,)?) => {
            $(
                struct $name {
                    $first: Shared<$a>,
                    $second: Shared<$b>,
                }

                impl Injectable for $name {
                    fn construct(args: &mut Arguments) -> Result<Self, Error> {
                        Ok($name {
                            $first: args.next()?,
                            $second: args.next()?,
                        })
                    }
                }
            )*
        };
    }

    warriors! {
        Ninja { katana: Katana, shuriken: Shuriken },
        Ronin { katana: Katana, shuriken: Shuriken },
        Samurai { primary: dyn Weapon, secondary: dyn Weapon },
        Shogun { primary: dyn Weapon, secondary: dyn Weapon },
    }

    fn katana_as_weapon() -> Class<dyn Weapon> {
        Class::<Katana>::new().upcast(|k| k as Shared<dyn Weapon>)
    }

    fn shuriken_as_weapon() -> Class<dyn Weapon> {
        Class::<Shuriken>::new().upcast(|s| s as Shared<dyn Weapon>)
    }

    #[test]
    fn register_binds_an_annotated_class() {
        let container = Container::new();
        let register = register(&container);
        register.bind("Katana").apply(Class::<Katana>::new()).unwrap();
        register.bind("Shuriken").apply(Class::<Shuriken>::new()).unwrap();
        register
            .bind("Ninja")
            .inject(["Katana", "Shuriken"])
            .apply(Class::<Ninja>::new())
            .unwrap();

        let ninja = container.get::<Ninja>("Ninja");
        assert_eq!(ninja.katana.name(), "Katana");
        assert_eq!(ninja.shuriken.name(), "Shuriken");
    }

    #[test]
    fn register_returns_the_class_it_was_applied_to() {
        let container = Container::new();
        let class = register(&container)
            .bind("Katana")
            .apply(Class::<Katana>::new())
            .unwrap();

        assert_eq!(class.key(), Class::<Katana>::new().key());
        assert!(container.is_bound("Katana"));
    }

    #[test]
    fn register_with_named_constraints() {
        let container = Container::new();
        let register = register(&container);
        register
            .bind("Weapon")
            .when(|b| {
                b.when_target_named("not-throwable");
            })
            .apply(katana_as_weapon())
            .unwrap();
        register
            .bind("Weapon")
            .when(|b| {
                b.when_target_named("throwable");
            })
            .apply(shuriken_as_weapon())
            .unwrap();
        register
            .bind("Samurai")
            .inject([
                QualifiedInjection::new("Weapon").named("not-throwable"),
                QualifiedInjection::new("Weapon").named("throwable"),
            ])
            .apply(Class::<Samurai>::new())
            .unwrap();

        let samurai = container.get::<Samurai>("Samurai");
        assert_eq!(samurai.primary.name(), "Katana");
        assert_eq!(samurai.secondary.name(), "Shuriken");
    }

    #[test]
    fn register_with_tagged_constraints() {
        let container = Container::new();
        let register = register(&container);
        register
            .bind("Weapon")
            .when(|b| {
                b.when_target_tagged("throwable", false);
            })
            .apply(katana_as_weapon())
            .unwrap();
        register
            .bind("Weapon")
            .when(|b| {
                b.when_target_tagged("throwable", true);
            })
            .apply(shuriken_as_weapon())
            .unwrap();
        register
            .bind("Shogun")
            .inject([
                Injection::tagged("Weapon", "throwable", false),
                Injection::tagged("Weapon", "throwable", true),
            ])
            .apply(Class::<Shogun>::new())
            .unwrap();

        let samurai = container.get::<Shogun>("Shogun");
        assert_eq!(samurai.primary.name(), "Katana");
        assert_eq!(samurai.secondary.name(), "Shuriken");
    }

    #[test]
    fn register_self_applies_scope_constraints() {
        let container = Container::new();
        let register_self = register_self(&container);
        register_self
            .bind()
            .when(|b| {
                b.in_singleton_scope();
            })
            .apply(Class::<Katana>::new())
            .unwrap();
        register_self
            .bind()
            .when(|b| {
                b.in_transient_scope();
            })
            .apply(Class::<Shuriken>::new())
            .unwrap();
        register_self
            .bind()
            .inject([Injection::class::<Katana>(), Injection::class::<Shuriken>()])
            .apply(Class::<Ronin>::new())
            .unwrap();

        let ninja1 = container.get::<Ronin>(ServiceId::of::<Ronin>());
        assert_eq!(ninja1.katana.durability.get(), 100);
        assert_eq!(ninja1.shuriken.durability.get(), 100);
        ninja1.katana.hit();
        ninja1.shuriken.hit();
        assert_eq!(ninja1.katana.durability.get(), 90);
        assert_eq!(ninja1.shuriken.durability.get(), 90);

        let ninja2 = container.get::<Ronin>(ServiceId::of::<Ronin>());
        assert_eq!(ninja2.katana.durability.get(), 90);
        assert_eq!(ninja2.shuriken.durability.get(), 100);
    }

    #[test]
    fn no_constraint_keeps_container_defaults() {
        let container = Container::with_options(crate::container::ContainerOptions {
            default_scope: Scope::Singleton,
            ..Default::default()
        });
        register_self(&container)
            .bind()
            .apply(Class::<Katana>::new())
            .unwrap();

        let a = container.get::<Katana>(ServiceId::of::<Katana>());
        let b = container.get::<Katana>(ServiceId::of::<Katana>());
        assert!(Shared::ptr_eq(&a, &b));
    }

    #[test]
    fn register_constructor_binds_the_class_handle() {
        let container = Container::new();
        let register_constructor = register_constructor(&container);
        register_constructor
            .bind("Class<Weapon>")
            .when(|b| {
                b.when_target_tagged("throwable", false);
            })
            .apply(katana_as_weapon())
            .unwrap();
        register_constructor
            .bind("Class<Weapon>")
            .when(|b| {
                b.when_target_tagged("throwable", true);
            })
            .apply(shuriken_as_weapon())
            .unwrap();
        register_constructor
            .bind("Class<Samurai>")
            .apply(Class::<Samurai>::new())
            .unwrap();

        let samurai = container.get::<Class<Samurai>>("Class<Samurai>");
        let katana =
            container.get_tagged::<Class<dyn Weapon>>("Class<Weapon>", "throwable", false);
        let shuriken =
            container.get_tagged::<Class<dyn Weapon>>("Class<Weapon>", "throwable", true);

        let samurai = samurai
            .instantiate(
                Arguments::new()
                    .with(katana.instantiate(Arguments::new()).unwrap())
                    .with(shuriken.instantiate(Arguments::new()).unwrap()),
            )
            .unwrap();
        assert_eq!(samurai.primary.name(), "Katana");
        assert_eq!(samurai.secondary.name(), "Shuriken");
    }

    struct Captured;

    impl Injectable for Captured {
        fn construct(_args: &mut Arguments) -> Result<Self, Error> {
            Ok(Captured)
        }
    }

    #[test]
    fn register_constructor_does_not_annotate() {
        let container = Container::new();
        register_constructor(&container)
            .bind("Class<Captured>")
            .apply(Class::<Captured>::new())
            .unwrap();

        assert!(crate::metadata::lookup(Class::<Captured>::new().key()).is_none());
    }

    #[test]
    fn register_constant_value_with_named_constraints() {
        let container = Container::new();
        let register_constant_value = register_constant_value(&container);
        let katana = Shared::new(Katana {
            durability: Cell::new(100),
        });
        register_constant_value
            .bind("Weapon")
            .when(|b| {
                b.when_target_named("not-throwable");
            })
            .to(katana.clone() as Shared<dyn Weapon>)
            .unwrap();
        register_constant_value
            .bind("Weapon")
            .when(|b| {
                b.when_target_named("throwable");
            })
            .to(Shared::new(Shuriken {
                durability: Cell::new(100),
            }) as Shared<dyn Weapon>)
            .unwrap();

        let first = container.get_named::<dyn Weapon>("Weapon", "not-throwable");
        let second = container.get_named::<dyn Weapon>("Weapon", "not-throwable");
        assert_eq!(first.name(), "Katana");
        assert!(Shared::ptr_eq(&first, &second));
        assert_eq!(
            container.get_named::<dyn Weapon>("Weapon", "throwable").name(),
            "Shuriken"
        );
    }

    #[test]
    fn register_dynamic_value_with_scope_and_tag() {
        let container = Container::new();
        let calls = Shared::new(Cell::new(0u32));
        let counter = calls.clone();
        let syntax = register_dynamic_value(&container)
            .bind("Weapon")
            .when(|b| {
                b.in_singleton_scope().when_target_tagged("sharp", true);
            })
            .to(move |_| {
                counter.set(counter.get() + 1);
                Ok(Shared::new(Katana {
                    durability: Cell::new(100),
                }) as Shared<dyn Weapon>)
            })
            .unwrap();

        assert_eq!(syntax.scope(), Scope::Singleton);
        assert_eq!(
            syntax.constraint(),
            Some(Constraint::Tagged("sharp".to_string(), true.into()))
        );

        let a = container.get_tagged::<dyn Weapon>("Weapon", "sharp", true);
        let b = container.get_tagged::<dyn Weapon>("Weapon", "sharp", true);
        assert!(Shared::ptr_eq(&a, &b));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn register_function_returns_the_same_function() {
        let container = Container::new();
        let register_function = register_function(&container);
        let double: Shared<dyn Fn(u32) -> u32> = Shared::new(|x| x * 2);
        let triple: Shared<dyn Fn(u32) -> u32> = Shared::new(|x| x * 3);
        register_function
            .bind("Multiply")
            .when(|b| {
                b.when_target_named("double");
            })
            .to(double.clone())
            .unwrap();
        register_function
            .bind("Multiply")
            .when(|b| {
                b.when_target_named("triple");
            })
            .to(triple)
            .unwrap();

        let resolved = container.get_named::<dyn Fn(u32) -> u32>("Multiply", "double");
        assert!(Shared::ptr_eq(&resolved, &double));
        assert_eq!(resolved(4), 8);
        assert_eq!(container.get_named::<dyn Fn(u32) -> u32>("Multiply", "triple")(4), 12);
    }

    #[test]
    fn register_auto_factory_resolves_target_each_call() {
        let container = Container::new();
        register(&container)
            .bind("Katana")
            .apply(Class::<Katana>::new())
            .unwrap();
        register_auto_factory(&container)
            .bind("Factory<Katana>")
            .when(|b| {
                b.when_target_named("katana");
            })
            .to::<Katana>("Katana")
            .unwrap();

        let factory = container.get_named::<AutoFactory<Katana>>("Factory<Katana>", "katana");
        assert_eq!(factory.target(), &ServiceId::from("Katana"));
        let first = factory.create().unwrap();
        let second = factory.create().unwrap();
        assert_eq!(first.name(), "Katana");
        assert!(!Shared::ptr_eq(&first, &second));
    }

    struct Armory {
        katana: Shared<Katana>,
        shuriken: Shared<Shuriken>,
    }

    impl Injectable for Armory {
        fn construct(args: &mut Arguments) -> Result<Self, Error> {
            let katana = args.next::<FactoryFn<Katana>>()?;
            let shuriken = args.next::<FactoryFn<Shuriken>>()?;
            Ok(Armory {
                katana: katana()?,
                shuriken: shuriken()?,
            })
        }
    }

    #[test]
    fn register_factory_injects_caller_built_factories() {
        let container = Container::new();
        let register = register(&container);
        let register_factory = register_factory(&container);
        register.bind("Katana").apply(Class::<Katana>::new()).unwrap();
        register.bind("Shuriken").apply(Class::<Shuriken>::new()).unwrap();

        register_factory
            .bind("Factory<Katana>")
            .to(|context| {
                let container = context.container().downgrade();
                let factory: Shared<FactoryFn<Katana>> =
                    Shared::new(move || -> Result<Shared<Katana>, Error> {
                        container
                            .upgrade()
                            .ok_or_else(|| Error::container_dropped("Katana"))?
                            .try_get::<Katana>("Katana")
                    });
                factory
            })
            .unwrap();
        register_factory
            .bind("Factory<Shuriken>")
            .to(|context| {
                let container = context.container().downgrade();
                let factory: Shared<FactoryFn<Shuriken>> =
                    Shared::new(move || -> Result<Shared<Shuriken>, Error> {
                        container
                            .upgrade()
                            .ok_or_else(|| Error::container_dropped("Shuriken"))?
                            .try_get::<Shuriken>("Shuriken")
                    });
                factory
            })
            .unwrap();
        register
            .bind("Armory")
            .inject(["Factory<Katana>", "Factory<Shuriken>"])
            .apply(Class::<Armory>::new())
            .unwrap();

        let armory = container.get::<Armory>("Armory");
        assert_eq!(armory.katana.name(), "Katana");
        assert_eq!(armory.shuriken.name(), "Shuriken");
    }

    struct Dojo {
        katana: Shared<ProviderFn<Katana>>,
        shuriken: Shared<ProviderFn<Shuriken>>,
    }

    impl Injectable for Dojo {
        fn construct(args: &mut Arguments) -> Result<Self, Error> {
            Ok(Dojo {
                katana: args.next()?,
                shuriken: args.next()?,
            })
        }
    }

    fn provider_of<T: 'static>(
        container: &Container,
        service: &'static str,
    ) -> Shared<ProviderFn<T>> {
        let container = container.downgrade();
        Shared::new(move || -> ProviderFuture<T> {
            let container = container.clone();
            Box::pin(async move {
                match container.upgrade() {
                    Some(container) => container.try_get::<T>(service),
                    None => Err(Error::container_dropped(service)),
                }
            })
        })
    }

    #[tokio::test]
    async fn register_provider_hands_out_unawaited_providers() {
        let container = Container::new();
        let register = register(&container);
        let register_provider = register_provider(&container);
        register.bind("Katana").apply(Class::<Katana>::new()).unwrap();
        register.bind("Shuriken").apply(Class::<Shuriken>::new()).unwrap();

        register_provider
            .bind("Provider<Katana>")
            .when(|b| {
                b.when_target_tagged("forged", true);
            })
            .to(|context| provider_of::<Katana>(context.container(), "Katana"))
            .unwrap();
        register_provider
            .bind("Provider<Shuriken>")
            .to(|context| provider_of::<Shuriken>(context.container(), "Shuriken"))
            .unwrap();
        register
            .bind("Dojo")
            .inject([
                Injection::tagged("Provider<Katana>", "forged", true),
                Injection::from("Provider<Shuriken>"),
            ])
            .apply(Class::<Dojo>::new())
            .unwrap();

        let dojo = container.get::<Dojo>("Dojo");
        let katana = (dojo.katana)().await.unwrap();
        let shuriken = (dojo.shuriken)().await.unwrap();
        assert_eq!(katana.name(), "Katana");
        assert_eq!(shuriken.name(), "Shuriken");
    }

    struct Rejected;

    impl Injectable for Rejected {
        fn construct(_args: &mut Arguments) -> Result<Self, Error> {
            Ok(Rejected)
        }
    }

    #[test]
    fn invalid_descriptor_is_raised_before_binding() {
        let container = Container::new();
        let err = register(&container)
            .bind("Rejected")
            .inject([QualifiedInjection::default().named("x")])
            .apply(Class::<Rejected>::new())
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidDescriptor);
        assert!(!container.is_bound("Rejected"));
    }

    #[test]
    fn registrars_are_reusable_and_cloneable() {
        let container = Container::new();
        let register_constant_value = register_constant_value(&container);
        let clone = register_constant_value.clone();
        register_constant_value.bind("A").to(Shared::new(1u8)).unwrap();
        clone.bind("B").to(Shared::new(2u8)).unwrap();

        assert_eq!(*container.get::<u8>("A"), 1);
        assert_eq!(*container.get::<u8>("B"), 2);
    }

    #[test]
    fn container_errors_surface_unchanged() {
        let container = Container::with_options(crate::container::ContainerOptions {
            forbid_rebinding: true,
            ..Default::default()
        });
        let register_constant_value = register_constant_value(&container);
        register_constant_value.bind("A").to(Shared::new(1u8)).unwrap();

        let err = register_constant_value
            .bind("A")
            .to(Shared::new(2u8))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateBinding);
    }

    struct Anvil;
    struct Hammer;

    struct Smithy {
        tool: Shared<Anvil>,
    }

    impl Injectable for Anvil {
        fn construct(_args: &mut Arguments) -> Result<Self, Error> {
            Ok(Anvil)
        }
    }

    impl Injectable for Hammer {
        fn construct(_args: &mut Arguments) -> Result<Self, Error> {
            Ok(Hammer)
        }
    }

    impl Injectable for Smithy {
        fn construct(args: &mut Arguments) -> Result<Self, Error> {
            Ok(Smithy { tool: args.next()? })
        }
    }

    #[test]
    fn rejected_registration_keeps_existing_annotations() {
        let container = Container::with_options(crate::container::ContainerOptions {
            forbid_rebinding: true,
            ..Default::default()
        });
        let register = register(&container);
        register.bind("Anvil").apply(Class::<Anvil>::new()).unwrap();
        register.bind("Hammer").apply(Class::<Hammer>::new()).unwrap();
        register
            .bind("Smithy")
            .inject(["Anvil"])
            .apply(Class::<Smithy>::new())
            .unwrap();
        assert!(container.try_get::<Smithy>("Smithy").is_ok());

        let err = register
            .bind("Smithy")
            .inject(["Hammer"])
            .apply(Class::<Smithy>::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateBinding);

        let smithy = container.try_get::<Smithy>("Smithy").unwrap();
        let _: &Anvil = &smithy.tool;
        let parameters = crate::metadata::lookup(Class::<Smithy>::new().key())
            .unwrap()
            .parameters;
        assert_eq!(parameters[0].service, Some(ServiceId::from("Anvil")));
    }

    fn counted_weapon(
        calls: &Shared<Cell<u32>>,
    ) -> impl Fn(&Context<'_>) -> Result<Shared<dyn Weapon>, Error> + 'static {
        let calls = calls.clone();
        move |_| {
            calls.set(calls.get() + 1);
            Ok(Shared::new(Katana {
                durability: Cell::new(100),
            }) as Shared<dyn Weapon>)
        }
    }

    #[test]
    fn register_dynamic_value_is_fresh_per_resolution() {
        let container = Container::new();
        let register_dynamic_value = register_dynamic_value(&container);
        let default_calls = Shared::new(Cell::new(0u32));
        let transient_calls = Shared::new(Cell::new(0u32));

        let syntax = register_dynamic_value
            .bind("Default")
            .to(counted_weapon(&default_calls))
            .unwrap();
        assert_eq!(syntax.scope(), Scope::Transient);
        let syntax = register_dynamic_value
            .bind("Transient")
            .when(|b| {
                b.in_transient_scope();
            })
            .to(counted_weapon(&transient_calls))
            .unwrap();
        assert_eq!(syntax.scope(), Scope::Transient);

        for (service, calls) in [("Default", &default_calls), ("Transient", &transient_calls)] {
            let first = container.get::<dyn Weapon>(service);
            let second = container.get::<dyn Weapon>(service);
            assert!(!Shared::ptr_eq(&first, &second));
            assert_eq!(calls.get(), 2);
        }
    }
}
