//! Service lifetime definitions.

use std::fmt;

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let db: Token<Database> = Token::new("Database");
/// let model: Token<RequestModel> = Token::new("RequestModel");
///
/// let registry = ServiceRegistry::new();
/// registry.register_singleton(&db, |_| Ok(Database { url: "postgres://localhost".into() }), ServiceOptions::new());
/// registry.register_transient(&model, |_| Ok(RequestModel { id: 7 }), ServiceOptions::new());
///
/// let db1 = registry.resolve(&db).unwrap();
/// let db2 = registry.resolve(&db).unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2)); // Same instance
///
/// let m1 = registry.resolve(&model).unwrap();
/// let m2 = registry.resolve(&model).unwrap();
/// assert!(!Arc::ptr_eq(&m1, &m2)); // Always different
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// Single instance per registry, cached until unregistered
    ///
    /// Created on first resolution (or by `initialize_all`) and returned
    /// unchanged on every later resolution.
    #[default]
    Singleton,
    /// Synonym for `Singleton`
    ///
    /// The registry is the only scope there is: scoped services are cached
    /// exactly like singletons. They are counted separately in stats and are
    /// not constructed by `initialize_all`.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Whether resolved instances are cached in the registry.
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        })
    }
}
