//! Registration helpers for a qualifier-aware dependency injection container.
//!
//! Classes are annotated with [`annotate`] and registered through the
//! factories in [`helpers`]; the [`Container`] resolves identifiers,
//! optionally narrowed by a name or a tag.

#[macro_use]
mod macros;

pub mod annotate;
pub mod binding;
pub mod container;
pub mod error;
pub mod factory;
pub mod helpers;
pub mod identifier;
pub mod injectable;
pub mod injection;
pub mod instance;
pub mod metadata;
pub mod resolve_guard;
pub mod runtime;
pub mod scope;

pub use annotate::annotate;
pub use binding::*;
pub use container::*;
pub use error::*;
pub use factory::*;
pub use identifier::*;
pub use injectable::*;
pub use injection::*;
pub use instance::*;
pub use resolve_guard::*;
pub use runtime::*;
pub use scope::*;
