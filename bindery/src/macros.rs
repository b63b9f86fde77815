//! Macros for declaring injectable classes and descriptor lists.
//!
//! - [`injectable!`] implements [`Injectable`](crate::Injectable), either by
//!   pulling one argument per field in declaration order or from a
//!   zero-argument constructor expression.
//! - [`injections!`] builds a `Vec<Injection>` from mixed descriptor values.
//!
//! # Example
//! ```
//! use bindery::{injectable, injections, Class, Container, Shared, Injection};
//!
//! struct Katana;
//! struct Shuriken;
//! struct Ninja {
//!     katana: Shared<Katana>,
//!     shuriken: Shared<Shuriken>,
//! }
//!
//! injectable!(Katana => Katana);
//! injectable!(Shuriken => Shuriken);
//! injectable!(Ninja { katana: Katana, shuriken: Shuriken });
//!
//! let descriptors = injections!["Katana", Injection::named("Shuriken", "throwable")];
//! assert_eq!(descriptors.len(), 2);
//! ```

/// Implements `Injectable` for a class.
///
/// - `Class { field: Type, .. }`: each field is a `Shared<Type>` taken from the
///   resolved arguments in order.
/// - `Class => expr`: the class takes no arguments and is built by `expr`.
#[macro_export]
macro_rules! injectable {
    // One resolved argument per field
    ($class:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::Injectable for $class {
            fn construct(
                #[allow(unused_variables)] args: &mut $crate::Arguments,
            ) -> ::std::result::Result<Self, $crate::Error> {
                ::std::result::Result::Ok($class {
                    $($field: args.next::<$ty>()?,)*
                })
            }
        }
    };

    // Zero-argument constructor
    ($class:ty => $ctor:expr) => {
        impl $crate::Injectable for $class {
            fn construct(
                _args: &mut $crate::Arguments,
            ) -> ::std::result::Result<Self, $crate::Error> {
                ::std::result::Result::Ok($ctor)
            }
        }
    };
}

/// Builds a descriptor list, converting each entry with `Injection::from`.
#[macro_export]
macro_rules! injections {
    ($($injection:expr),* $(,)?) => {{
        let injections: ::std::vec::Vec<$crate::Injection> =
            ::std::vec![$($crate::Injection::from($injection)),*];
        injections
    }};
}
