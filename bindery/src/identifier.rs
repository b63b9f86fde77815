//! Service identifiers and qualifier values.
//!
//! A [`ServiceId`] is what a binding is registered under and what an
//! injection site asks for. Three flavours are accepted and treated opaquely:
//!
//! - string names (`"Katana"`),
//! - symbolic [`Token`]s, either unique or keyed through a global registry,
//! - class references, i.e. the identity of a concrete Rust type.
//!
//! # Examples
//!
//! ```
//! use bindery::identifier::{ServiceId, Token};
//!
//! struct Katana;
//!
//! let by_name = ServiceId::from("Katana");
//! let by_token = ServiceId::from(Token::for_key("Katana"));
//! let by_class = ServiceId::of::<Katana>();
//!
//! assert_ne!(by_name, by_token);
//! assert_ne!(by_token, by_class);
//! assert_eq!(by_token, ServiceId::from(Token::for_key("Katana")));
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity of a concrete Rust type, used as a class reference.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TokenKind {
    Unique(u64),
    Keyed(String),
}

/// Symbolic identifier.
///
/// [`Token::new`] returns a token equal only to its own clones;
/// [`Token::for_key`] returns tokens that compare equal whenever the keys do.
#[derive(Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    description: String,
}

impl Token {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Unique(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed)),
            description: description.into(),
        }
    }

    pub fn for_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            kind: TokenKind::Keyed(key.clone()),
            description: key,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

/// What a binding is registered under and what an injection site requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceId {
    Name(String),
    Token(Token),
    Type(TypeKey),
}

impl ServiceId {
    /// Class reference identifier for the concrete type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        ServiceId::Type(TypeKey::of::<T>())
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Name(name) => write!(f, "\"{}\"", name),
            ServiceId::Token(token) => write!(f, "Token({})", token.description),
            ServiceId::Type(key) => write!(f, "{}", key.name),
        }
    }
}

impl From<&str> for ServiceId {
    fn from(name: &str) -> Self {
        ServiceId::Name(name.to_string())
    }
}

impl From<String> for ServiceId {
    fn from(name: String) -> Self {
        ServiceId::Name(name)
    }
}

impl From<Token> for ServiceId {
    fn from(token: Token) -> Self {
        ServiceId::Token(token)
    }
}

impl From<&Token> for ServiceId {
    fn from(token: &Token) -> Self {
        ServiceId::Token(token.clone())
    }
}

impl From<TypeKey> for ServiceId {
    fn from(key: TypeKey) -> Self {
        ServiceId::Type(key)
    }
}

impl From<&ServiceId> for ServiceId {
    fn from(id: &ServiceId) -> Self {
        id.clone()
    }
}

/// Value side of a tag qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(value) => write!(f, "{}", value),
            TagValue::Int(value) => write!(f, "{}", value),
            TagValue::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Int(value)
    }
}

impl From<i32> for TagValue {
    fn from(value: i32) -> Self {
        TagValue::Int(i64::from(value))
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Str(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Str(value)
    }
}
