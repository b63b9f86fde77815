//! Callable values produced by factory-style bindings.
//!
//! - [`AutoFactory<T>`] is built by the container itself and resolves its
//!   target identifier on every call.
//! - [`FactoryFn<T>`] and [`ProviderFn<T>`] are the conventional shapes for
//!   caller-built factories and asynchronous providers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::container::{Container, WeakContainer};
use crate::error::Error;
use crate::identifier::ServiceId;
use crate::runtime::Shared;

#[cfg(feature = "tracing")]
use tracing::trace;

/// Synchronous factory: builds a `T` each time it is called.
pub type FactoryFn<T> = dyn Fn() -> Result<Shared<T>, Error>;

/// Deferred result of a provider call.
pub type ProviderFuture<T> = Pin<Box<dyn Future<Output = Result<Shared<T>, Error>>>>;

/// Asynchronous provider: hands out a future for a `T` each time it is called.
pub type ProviderFn<T> = dyn Fn() -> ProviderFuture<T>;

/// Zero-argument factory resolving `target` from its container on each call.
///
/// It only keeps a weak handle, so storing it inside the same container does
/// not keep the container alive.
pub struct AutoFactory<T: ?Sized + 'static> {
    container: WeakContainer,
    target: ServiceId,
    _marker: std::marker::PhantomData<fn() -> Shared<T>>,
}

impl<T: ?Sized + 'static> AutoFactory<T> {
    pub(crate) fn new(container: &Container, target: ServiceId) -> Self {
        Self {
            container: container.downgrade(),
            target,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn target(&self) -> &ServiceId {
        &self.target
    }

    /// Resolves the target identifier.
    pub fn create(&self) -> Result<Shared<T>, Error> {
        #[cfg(feature = "tracing")]
        trace!("Auto factory resolving {}", self.target);

        let container = self
            .container
            .upgrade()
            .ok_or_else(|| Error::container_dropped(&self.target.to_string()))?;
        container.try_get::<T>(self.target.clone())
    }
}

impl<T: ?Sized + 'static> fmt::Debug for AutoFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoFactory")
            .field("target", &self.target)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}
