//! Service descriptors and registry statistics for introspection.

use crate::lifetime::Lifetime;
use crate::token::AnyToken;

/// Read-only snapshot of one registration
///
/// Returned by [`ServiceRegistry::descriptor`](crate::ServiceRegistry::descriptor).
/// Taking a snapshot never triggers resolution.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Lifetime, ServiceOptions, ServiceRegistry, Token};
///
/// let config: Token<u32> = Token::new("Port");
/// let server: Token<String> = Token::new("Server");
///
/// let registry = ServiceRegistry::new();
/// registry.register_instance(&config, 8080u32);
/// registry.register_transient(
///     &server,
///     |deps| Ok(format!("listening on {}", deps.get::<u32>(0)?)),
///     ServiceOptions::new().depends_on(&config),
/// );
///
/// let descriptor = registry.descriptor(&server).unwrap();
/// assert_eq!(descriptor.name(), "Server");
/// assert_eq!(descriptor.lifetime, Lifetime::Transient);
/// assert_eq!(descriptor.dependencies, vec![config.erase()]);
/// assert!(!descriptor.initialized);
///
/// assert!(registry.descriptor(&config).unwrap().initialized);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Token the service is registered under
    pub token: AnyToken,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Declared dependencies, in positional order
    pub dependencies: Vec<AnyToken>,
    /// Whether a cached instance currently exists
    pub initialized: bool,
    /// Whether the cached instance is disposed on teardown
    pub disposable: bool,
    /// Whether the instance takes part in `ready_all`
    pub ready_checked: bool,
}

impl ServiceDescriptor {
    /// Diagnostic name of the token.
    pub fn name(&self) -> &'static str {
        self.token.name()
    }

    /// `std::any::type_name` of the service type.
    pub fn type_name(&self) -> &'static str {
        self.token.type_name()
    }

    /// Returns true if `token` is among the declared dependencies.
    pub fn depends_on(&self, token: impl Into<AnyToken>) -> bool {
        let token = token.into();
        self.dependencies.contains(&token)
    }
}

/// Registration counts by lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub singletons: usize,
    pub scoped: usize,
    pub transients: usize,
    /// Singletons whose instance has been constructed (or was pre-built)
    pub initialized_singletons: usize,
}

impl RegistryStats {
    pub(crate) fn record(&mut self, lifetime: Lifetime, initialized: bool) {
        self.total += 1;
        match lifetime {
            Lifetime::Singleton => {
                self.singletons += 1;
                if initialized {
                    self.initialized_singletons += 1;
                }
            }
            Lifetime::Scoped => self.scoped += 1,
            Lifetime::Transient => self.transients += 1,
        }
    }
}
