//! Readiness capability for two-phase construction.

use crate::error::BoxError;

/// Trait for services that finish initializing asynchronously.
///
/// Factories stay synchronous: they build the instance and return at once.
/// Work that has to await (opening a connection, fetching remote config) goes
/// in `ready`, which [`ServiceRegistry::ready_all`](crate::ServiceRegistry::ready_all)
/// awaits for every constructed instance that opted in through
/// [`ServiceOptions::ready_check`](crate::ServiceOptions::ready_check).
///
/// # Examples
///
/// ```
/// use ferrous_registry::{BoxError, ReadyCheck};
/// use async_trait::async_trait;
///
/// struct CatalogClient {
///     base_url: String,
/// }
///
/// #[async_trait]
/// impl ReadyCheck for CatalogClient {
///     async fn ready(&self) -> Result<(), BoxError> {
///         println!("Warming up {}", self.base_url);
///         Ok(())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ReadyCheck: Send + Sync + 'static {
    /// Completes initialization, or reports why the service is not usable.
    async fn ready(&self) -> Result<(), BoxError>;
}
