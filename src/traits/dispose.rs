//! Disposal capability for resource cleanup.

use crate::error::BoxError;

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (closing
/// connections, flushing caches) and opt in with
/// [`ServiceOptions::disposable`](crate::ServiceOptions::disposable). The
/// registry calls `dispose` on the cached instance when the service is
/// unregistered or the registry is cleared. A returned error (or a panic) is
/// logged and does not stop the teardown.
///
/// # Examples
///
/// ```
/// use ferrous_registry::{BoxError, Dispose, ServiceOptions, ServiceRegistry, Token};
///
/// struct Cache {
///     name: String,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) -> Result<(), BoxError> {
///         println!("Flushing cache: {}", self.name);
///         Ok(())
///     }
/// }
///
/// let cache: Token<Cache> = Token::new("Cache");
/// let registry = ServiceRegistry::new();
/// registry.register_singleton(
///     &cache,
///     |_| Ok(Cache { name: "user_cache".to_string() }),
///     ServiceOptions::new().disposable(),
/// );
/// registry.resolve(&cache).unwrap();
/// assert!(registry.unregister(&cache));
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self) -> Result<(), BoxError>;
}
