//! Error types for the service registry.

use std::error::Error as StdError;
use std::sync::Arc;

/// Boxed error returned by factories and disposal hooks.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Registry errors
///
/// Represents the failure conditions of service resolution. Validation
/// problems are not errors of this kind; they are collected in a
/// [`ValidationReport`](crate::ValidationReport) instead.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{DiError, ServiceRegistry, Token};
///
/// let registry = ServiceRegistry::new();
/// let missing: Token<String> = Token::new("Missing");
/// match registry.resolve(&missing) {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "Missing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_registry::DiError;
///
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// Service not registered
    #[error("Service not registered: {0}")]
    NotFound(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Factory failed while constructing a service
    #[error("Failed to construct {service}: {source}")]
    Construction {
        service: &'static str,
        #[source]
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Positional dependency access out of range
    #[error("Dependency index {index} out of range for {service} ({len} declared)")]
    DependencyIndex {
        service: &'static str,
        index: usize,
        len: usize,
    },
    /// Readiness check failed for an already constructed service
    #[cfg(feature = "async")]
    #[error("Readiness check failed for {service}: {source}")]
    ReadyCheck {
        service: &'static str,
        #[source]
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },
}

impl DiError {
    /// Wraps a factory failure with the name of the service being built.
    pub(crate) fn construction(service: &'static str, source: BoxError) -> Self {
        DiError::Construction { service, source: Arc::from(source) }
    }

    /// Returns the cycle path if this is a circular dependency error.
    pub fn cycle(&self) -> Option<&[&'static str]> {
        match self {
            DiError::Circular(path) => Some(path),
            _ => None,
        }
    }

    /// Follows `Construction` wrappers down to the innermost registry error.
    ///
    /// A factory that returns a `DiError` from `Dependencies::get` (through
    /// `?`) is reported as `Construction`; this recovers the original error.
    pub fn root(&self) -> &DiError {
        let mut current = self;
        while let DiError::Construction { source, .. } = current {
            match source.downcast_ref::<DiError>() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }
}

/// Result type for registry operations
///
/// A convenience alias for `Result<T, DiError>`.
pub type DiResult<T> = Result<T, DiError>;
