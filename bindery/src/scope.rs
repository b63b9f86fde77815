use std::fmt;

/// Lifecycle policy of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// One instance, created on first resolution and reused afterwards.
    Singleton,
    /// A fresh instance per resolution.
    #[default]
    Transient,
}

impl Scope {
    pub fn is_singleton(self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "singleton"),
            Scope::Transient => write!(f, "transient"),
        }
    }
}
