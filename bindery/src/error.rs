//! Error types for the bindery container and its registration helpers.
//!
//! This module defines a lightweight error model used across the crate to
//! describe failures that can occur while annotating classes, binding
//! services and resolving them.
//!
//! # Design
//!
//! - `ErrorKind` captures the error category.
//! - `Error` stores the category and a human-readable message.
//!
//! The helpers in `Error` are provided to keep call sites concise and to
//! maintain consistent error messages.
//!
//! # Feature Flags
//!
//! - `tracing`: logs errors when they are created.
//! - `debug`: prefixes the error kind in `Display`.
//!
//! # Examples
//!
//! ```
//! use bindery::error::Error;
//!
//! let err = Error::service_not_bound("\"Katana\"");
//! assert!(err.message.contains("Katana"));
//! ```

use core::fmt;

#[cfg(feature = "tracing")]
use tracing::{error, warn};

/// Error categories for the container.
///
/// Wiring mistakes (a bad descriptor, a missing binding) are separated from
/// internal inconsistencies so callers can match on them at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A qualified injection descriptor carries no service identifier.
    InvalidDescriptor,
    /// The container refuses a second binding for the same identifier.
    DuplicateBinding,
    /// No binding satisfies the requested identifier and qualifiers.
    ServiceNotBound,
    /// More than one binding satisfies the requested identifier and qualifiers.
    AmbiguousMatch,
    /// A resolved value does not have the requested type.
    TypeMismatch,
    /// A class binding was resolved but the class was never annotated.
    MissingAnnotation,
    /// A constructor asked for more arguments than were resolved for it.
    MissingArgument,
    /// Circular dependency detected in resolution chain.
    CircularDependency,
    /// An auto factory outlived the container it resolves from.
    ContainerDropped,
}

/// Container error structure.
///
/// `kind` enables programmatic handling, while `message` is human-readable.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// If the `tracing` feature is enabled, the error is automatically logged:
    /// wiring mistakes at warn level, everything else at error level.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let error = Self {
            kind,
            message: message.into(),
        };

        #[cfg(feature = "tracing")]
        if matches!(
            error.kind,
            ErrorKind::DuplicateBinding | ErrorKind::ServiceNotBound | ErrorKind::InvalidDescriptor
        ) {
            warn!("{}", error);
        } else {
            error!("{}", error);
        }

        error
    }

    /// A qualified descriptor at `index` for `class_name` has no service identifier.
    pub fn invalid_descriptor(class_name: &str, index: usize) -> Self {
        Self::new(
            ErrorKind::InvalidDescriptor,
            format!(
                "Injection descriptor at parameter {} of {} is missing a service identifier",
                index, class_name
            ),
        )
    }

    /// The container forbids rebinding and `service` is already bound.
    pub fn duplicate_binding(service: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateBinding,
            format!("Service identifier already bound: {}", service),
        )
    }

    /// Nothing is bound for `target`.
    pub fn service_not_bound(target: &str) -> Self {
        Self::new(
            ErrorKind::ServiceNotBound,
            format!("No matching bindings found for: {}", target),
        )
    }

    /// `count` bindings matched `target`.
    pub fn ambiguous_match(target: &str, count: usize) -> Self {
        Self::new(
            ErrorKind::AmbiguousMatch,
            format!("Ambiguous match: {} bindings found for: {}", count, target),
        )
    }

    /// Type mismatch during downcast of a resolved value.
    pub fn type_mismatch(type_name: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("Type mismatch when resolving: {}", type_name),
        )
    }

    /// `class_name` is bound as a class but was never marked injectable.
    pub fn missing_annotation(class_name: &str) -> Self {
        Self::new(
            ErrorKind::MissingAnnotation,
            format!("Missing injectable annotation for class: {}", class_name),
        )
    }

    /// `class_name` asked for argument `index` but none was resolved for it.
    pub fn missing_argument(class_name: &str, index: usize) -> Self {
        Self::new(
            ErrorKind::MissingArgument,
            format!(
                "No injection recorded for argument {} of class: {}",
                index, class_name
            ),
        )
    }

    /// Circular dependency detected in resolution chain.
    pub fn circular_dependency(dependency_chain: &[&str]) -> Self {
        Self::new(
            ErrorKind::CircularDependency,
            format!(
                "Circular dependency detected: {}",
                dependency_chain.join(" -> ")
            ),
        )
    }

    /// An auto factory for `service` was called after its container was dropped.
    pub fn container_dropped(service: &str) -> Self {
        Self::new(
            ErrorKind::ContainerDropped,
            format!("Container dropped before auto factory for {} was called", service),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "debug")]
        {
            write!(f, "({:?}) - {}", self.kind, self.message)
        }
        #[cfg(not(feature = "debug"))]
        {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for Error {}
