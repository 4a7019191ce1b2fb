//! Service tokens for the registry.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a token.
///
/// Identities are allocated from a global counter and never reused, so two
/// tokens compare equal only when one is a copy of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u64);

impl TokenId {
    fn next() -> Self {
        TokenId(NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Typed key naming one registrable service.
///
/// A token is nominal: the display name is informational only and plays no
/// part in equality or hashing. Creating two tokens with the same name yields
/// two distinct services.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::Token;
///
/// struct HttpClient;
///
/// let a: Token<HttpClient> = Token::new("HttpClient");
/// let b: Token<HttpClient> = Token::new("HttpClient");
/// let a_copy = a;
///
/// assert_eq!(a, a_copy);
/// assert_ne!(a, b); // same name, different identity
/// assert_eq!(a.name(), "HttpClient");
/// ```
pub struct Token<T: ?Sized> {
    id: TokenId,
    name: &'static str,
    _service: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + 'static> Token<T> {
    /// Allocates a fresh token with the given diagnostic name.
    pub fn new(name: &'static str) -> Self {
        Self {
            id: TokenId::next(),
            name,
            _service: PhantomData,
        }
    }

    /// Identity of this token.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Diagnostic name given at creation.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type-erased form, used in dependency lists and introspection.
    pub fn erase(&self) -> AnyToken {
        AnyToken {
            id: self.id,
            name: self.name,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl<T: ?Sized> Clone for Token<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Token<T> {}

impl<T: ?Sized> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: ?Sized> Eq for Token<T> {}

impl<T: ?Sized> Hash for Token<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}#{})", self.name, self.id.0)
    }
}

impl<T: ?Sized> fmt::Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased token.
///
/// Carries the identity and diagnostic name of a [`Token`] together with the
/// name of the service type it was created for. Equality and hashing use the
/// identity only.
#[derive(Clone, Copy)]
pub struct AnyToken {
    id: TokenId,
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
}

impl AnyToken {
    /// Identity of the token.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Diagnostic name given at creation.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `std::any::type_name` of the service type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if this token was created for service type `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl<T: ?Sized + 'static> From<Token<T>> for AnyToken {
    fn from(token: Token<T>) -> Self {
        token.erase()
    }
}

impl<T: ?Sized + 'static> From<&Token<T>> for AnyToken {
    fn from(token: &Token<T>) -> Self {
        token.erase()
    }
}

impl PartialEq for AnyToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnyToken {}

impl Hash for AnyToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: ?Sized> PartialEq<Token<T>> for AnyToken {
    fn eq(&self, other: &Token<T>) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for AnyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyToken({}#{}: {})", self.name, self.id.0, self.type_name)
    }
}

impl fmt::Display for AnyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
