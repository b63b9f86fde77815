//! Runtime type definitions for shared ownership and interior mutability.
//!
//! The container is single-threaded: it is wired from application startup
//! code and resolved on the same thread, so ownership is reference counted
//! with [`Rc`] and mutation goes through [`RefCell`].
//!
//! # Type Aliases
//!
//! - [`Shared<T>`]: Smart pointer for shared ownership
//! - [`Store<T>`]: Container providing interior mutability
//! - [`Value`]: A type-erased resolved value
//!
//! # Examples
//!
//! ```
//! use bindery::runtime::{Shared, Store};
//!
//! let value = Store::new(42);
//! let shared = Shared::new(value);
//! *shared.borrow_mut() += 1;
//! assert_eq!(*shared.borrow(), 43);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Type alias for shared ownership of data.
pub type Shared<T> = Rc<T>;

/// Non-owning counterpart of [`Shared<T>`].
pub type WeakShared<T> = Weak<T>;

/// Type alias for interior mutability with runtime borrow checking.
pub type Store<T> = RefCell<T>;

/// A resolved value with its static type erased.
///
/// The erased object is always an [`Instance<T>`](crate::instance::Instance),
/// which lets unsized service types such as `dyn Trait` travel through the
/// container.
pub type Value = Shared<dyn Any>;
