//! Resolved dependency bundle passed to factories.

use std::any::type_name;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::registration::AnyArc;
use crate::token::{AnyToken, Token};

/// Already-resolved dependencies of the service being constructed.
///
/// Entries are in the order the dependencies were declared, so
/// `deps.get::<B>(0)` is the first declared dependency. Lookup by token is
/// also available for factories that prefer names over positions.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
///
/// let c: Token<String> = Token::new("C");
/// let b: Token<String> = Token::new("B");
///
/// let registry = ServiceRegistry::new();
/// registry.register_singleton(&c, |_| Ok("c".to_string()), ServiceOptions::new());
/// registry.register_singleton(
///     &b,
///     move |deps| {
///         assert_eq!(deps.len(), 1);
///         let by_position = deps.get::<String>(0)?;
///         let by_token = deps.get_by(&c)?;
///         assert_eq!(by_position, by_token);
///         Ok(format!("{}b", by_position))
///     },
///     ServiceOptions::new().depends_on(&c),
/// );
///
/// assert_eq!(*registry.resolve(&b).unwrap(), "cb");
/// ```
pub struct Dependencies {
    service: &'static str,
    items: Vec<(AnyToken, AnyArc)>,
}

impl Dependencies {
    pub(crate) fn new(service: &'static str, items: Vec<(AnyToken, AnyArc)>) -> Self {
        Self { service, items }
    }

    /// Returns the dependency at `index`, downcast to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        let (token, instance) = self.items.get(index).ok_or(DiError::DependencyIndex {
            service: self.service,
            index,
            len: self.items.len(),
        })?;
        downcast(token, instance)
    }

    /// Returns the dependency registered under `token`.
    ///
    /// Fails with `NotFound` if `token` was not declared as a dependency of
    /// the service being constructed.
    pub fn get_by<T: Send + Sync + 'static>(&self, token: &Token<T>) -> DiResult<Arc<T>> {
        let (found, instance) = self
            .items
            .iter()
            .find(|(candidate, _)| *candidate == *token)
            .ok_or(DiError::NotFound(token.name()))?;
        downcast(found, instance)
    }

    /// Declared dependency tokens, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &AnyToken> {
        self.items.iter().map(|(token, _)| token)
    }

    /// Name of the service being constructed.
    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn downcast<T: Send + Sync + 'static>(token: &AnyToken, instance: &AnyArc) -> DiResult<Arc<T>> {
    instance.clone().downcast::<T>().map_err(|_| {
        tracing::debug!(
            dependency = token.name(),
            registered_as = token.type_name(),
            requested = type_name::<T>(),
            "Dependency requested with the wrong type"
        );
        DiError::TypeMismatch(type_name::<T>())
    })
}
