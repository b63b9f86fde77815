//! Thread-local stack guard for circular dependency detection.
//!
//! This module provides [`ResolveGuard`], a utility for tracking the chain of
//! bindings being resolved. Each binding has a unique key; pushing a key that
//! is already on the stack means the binding (indirectly) depends on itself
//! and yields a [`CircularDependency`](crate::ErrorKind::CircularDependency)
//! error listing the chain.
//!
//! Keys identify bindings rather than service identifiers, so two bindings of
//! the same identifier that differ by qualifier can depend on each other.
//!
//! # Example
//! ```
//! use bindery::{ErrorKind, ResolveGuard};
//!
//! let _g1 = ResolveGuard::push(1, "\"Ninja\"").unwrap();
//! let _g2 = ResolveGuard::push(2, "\"Katana\"").unwrap();
//! let err = ResolveGuard::push(1, "\"Ninja\"").unwrap_err();
//! assert!(matches!(err.kind, ErrorKind::CircularDependency));
//! ```

use std::cell::RefCell;

use crate::Error;

thread_local! {
    // Stack of (binding key, label) pairs being resolved in this thread.
    static RESOLVE_STACK: RefCell<Vec<(u64, String)>> = const { RefCell::new(Vec::new()) };
}

/// Guard that pops the last pushed binding from the thread-local stack on drop.
#[derive(Debug)]
pub struct ResolveGuard {
    pub key: u64,
}

impl ResolveGuard {
    /// Try to push a binding key onto the thread-local stack.
    ///
    /// Returns `Err(Error::circular_dependency(..))` if the key is already on
    /// the stack. Otherwise, returns a guard that will pop the key on drop.
    pub fn push(key: u64, label: &str) -> Result<Self, Error> {
        RESOLVE_STACK.with(|stack| {
            let mut v = stack.borrow_mut();
            if let Some(start) = v.iter().position(|(k, _)| *k == key) {
                let mut chain: Vec<&str> = v[start..].iter().map(|(_, l)| l.as_str()).collect();
                chain.push(label);
                return Err(Error::circular_dependency(&chain));
            }
            v.push((key, label.to_string()));
            Ok(ResolveGuard { key })
        })
    }

    /// Current depth of the resolution chain on this thread.
    pub fn depth() -> usize {
        RESOLVE_STACK.with(|stack| stack.borrow().len())
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        RESOLVE_STACK.with(|stack| {
            let mut v = stack.borrow_mut();
            v.pop();
        });
    }
}
