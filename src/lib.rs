//! # ferrous-registry
//!
//! Token-keyed service registry with explicit dependencies, three lifetimes
//! and circular dependency detection.
//!
//! ## Features
//!
//! - **Nominal tokens**: services are keyed by [`Token`] identity, never by name
//! - **Explicit dependencies**: each registration declares the tokens its
//!   factory needs; they are resolved first and passed positionally
//! - **Lifetimes**: Singleton, Scoped (a synonym for singleton) and Transient
//! - **Circular dependency detection**: at resolution time, with the full path
//! - **Validation**: whole-graph audit for missing, self and circular dependencies
//! - **Teardown**: opt-in [`Dispose`] capability invoked by `unregister`/`clear`
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
//!
//! let c: Token<String> = Token::new("C");
//! let b: Token<String> = Token::new("B");
//! let a: Token<String> = Token::new("A");
//!
//! let registry = ServiceRegistry::new();
//! registry
//!     .register_singleton(&c, |_| Ok("c".to_string()), ServiceOptions::new())
//!     .register_singleton(&b, |deps| Ok(format!("{}b", deps.get::<String>(0)?)), ServiceOptions::new().depends_on(&c))
//!     .register_singleton(&a, |deps| Ok(format!("{}a", deps.get::<String>(0)?)), ServiceOptions::new().depends_on(&b));
//!
//! assert!(registry.validate().is_valid());
//! assert_eq!(*registry.resolve(&a).unwrap(), "cba");
//! ```
//!
//! ## Circular Dependencies
//!
//! ```rust
//! use ferrous_registry::{DiError, ServiceOptions, ServiceRegistry, Token};
//!
//! let a: Token<()> = Token::new("A");
//! let b: Token<()> = Token::new("B");
//!
//! let registry = ServiceRegistry::new();
//! registry.register(&a, |_| Ok(()), ServiceOptions::new().depends_on(&b));
//! registry.register(&b, |_| Ok(()), ServiceOptions::new().depends_on(&a));
//!
//! match registry.resolve(&a) {
//!     Err(DiError::Circular(path)) => assert_eq!(path, vec!["A", "B", "A"]),
//!     _ => unreachable!(),
//! }
//! assert!(!registry.validate().is_valid());
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; install any subscriber to see
//! registrations, overwrites, optional-resolution failures and teardown
//! errors.

// Module declarations
pub mod config;
pub mod dependencies;
pub mod descriptors;
pub mod error;
pub mod lifetime;
pub mod options;
pub mod registry;
pub mod token;
pub mod traits;
pub mod validation;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use config::{ConfigError, RegistryConfig};
pub use dependencies::Dependencies;
pub use descriptors::{RegistryStats, ServiceDescriptor};
pub use error::{BoxError, DiError, DiResult};
pub use lifetime::Lifetime;
pub use options::ServiceOptions;
pub use registry::{InitializeReport, ServiceRegistry};
pub use token::{AnyToken, Token, TokenId};
pub use traits::Dispose;
pub use validation::{ValidationError, ValidationReport};

#[cfg(feature = "async")]
pub use registry::{ReadinessReport, ReadinessResult};
#[cfg(feature = "async")]
pub use traits::ReadyCheck;
