//! Per-registration options: lifetime, declared dependencies, capabilities.

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{BoxError, DiError};
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Hooks};
use crate::token::AnyToken;
use crate::traits::Dispose;

/// Registration options for a service of type `T`.
///
/// Defaults to a singleton with no dependencies and no capabilities.
/// Dependencies are passed to the factory positionally, in the order they
/// are declared here.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Lifetime, ServiceOptions, ServiceRegistry, Token};
///
/// struct Config { base_url: String }
/// struct HttpClient { base_url: String }
///
/// let config: Token<Config> = Token::new("Config");
/// let http: Token<HttpClient> = Token::new("HttpClient");
///
/// let registry = ServiceRegistry::new();
/// registry.register_instance(&config, Config { base_url: "https://api.example".into() });
/// registry.register(
///     &http,
///     |deps| {
///         let config = deps.get::<Config>(0)?;
///         Ok(HttpClient { base_url: config.base_url.clone() })
///     },
///     ServiceOptions::new().lifetime(Lifetime::Transient).depends_on(&config),
/// );
///
/// assert_eq!(registry.resolve(&http).unwrap().base_url, "https://api.example");
/// ```
pub struct ServiceOptions<T> {
    pub(crate) lifetime: Lifetime,
    pub(crate) dependencies: Vec<AnyToken>,
    pub(crate) hooks: Hooks,
    _service: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ServiceOptions<T> {
    /// Singleton, no dependencies.
    pub fn new() -> Self {
        Self {
            lifetime: Lifetime::Singleton,
            dependencies: Vec::new(),
            hooks: Hooks::default(),
            _service: PhantomData,
        }
    }

    /// Shorthand for `new().lifetime(Lifetime::Singleton)`.
    pub fn singleton() -> Self {
        Self::new()
    }

    /// Shorthand for `new().lifetime(Lifetime::Scoped)`.
    pub fn scoped() -> Self {
        Self::new().lifetime(Lifetime::Scoped)
    }

    /// Shorthand for `new().lifetime(Lifetime::Transient)`.
    pub fn transient() -> Self {
        Self::new().lifetime(Lifetime::Transient)
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Appends one dependency; it becomes the next positional argument.
    pub fn depends_on(mut self, token: impl Into<AnyToken>) -> Self {
        self.dependencies.push(token.into());
        self
    }

    /// Appends several dependencies in iteration order.
    pub fn depends_on_all<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AnyToken>,
    {
        self.dependencies.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Declares that cached instances are disposed on `unregister`/`clear`.
    pub fn disposable(mut self) -> Self
    where
        T: Dispose,
    {
        self.hooks.dispose = Some(Arc::new(|instance: &AnyArc| -> Result<(), BoxError> {
            match instance.downcast_ref::<T>() {
                Some(service) => service.dispose(),
                None => Err(Box::new(DiError::TypeMismatch(type_name::<T>()))),
            }
        }));
        self
    }

    /// Declares that constructed instances take part in `ready_all`.
    #[cfg(feature = "async")]
    pub fn ready_check(mut self) -> Self
    where
        T: crate::traits::ReadyCheck,
    {
        use crate::registration::ReadyFuture;

        self.hooks.ready = Some(Arc::new(|instance: AnyArc| -> ReadyFuture {
            Box::pin(async move {
                let service = instance
                    .downcast::<T>()
                    .map_err(|_| Box::new(DiError::TypeMismatch(type_name::<T>())) as BoxError)?;
                service.ready().await
            })
        }));
        self
    }
}

impl<T: Send + Sync + 'static> Default for ServiceOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}
