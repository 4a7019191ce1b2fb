//! The service registry: registration, resolution and introspection.
//!
//! Lifecycle operations (teardown, eager initialization, readiness) live in
//! [`lifecycle`].

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::RegistryConfig;
use crate::dependencies::Dependencies;
use crate::descriptors::{RegistryStats, ServiceDescriptor};
use crate::error::{BoxError, DiError, DiResult};
use crate::internal::ResolutionStack;
use crate::lifetime::Lifetime;
use crate::options::ServiceOptions;
use crate::registration::{AnyArc, Ctor, Hooks, Registration, Registry};
use crate::token::{AnyToken, Token};
use crate::validation::{validate_graph, ValidationReport};

pub mod lifecycle;

pub use lifecycle::InitializeReport;
#[cfg(feature = "async")]
pub use lifecycle::{ReadinessReport, ReadinessResult};

/// Token-keyed service registry.
///
/// Owns the registration table, resolves object graphs on demand and
/// rejects circular dependencies. Construct one per composition root (or
/// per test) and pass it by reference; there is no global instance.
///
/// # Thread Safety
///
/// The registry is built for single-threaded use: it is `Send` but not
/// `Sync`. Share it across threads behind a `Mutex`, or give each thread
/// its own registry.
///
/// # Examples
///
/// ```
/// use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let db: Token<Database> = Token::new("Database");
/// let users: Token<UserService> = Token::new("UserService");
///
/// let registry = ServiceRegistry::new();
/// registry.register_instance(&db, Database { url: "postgres://localhost".to_string() });
/// registry.register_transient(
///     &users,
///     |deps| Ok(UserService { db: deps.get(0)? }),
///     ServiceOptions::new().depends_on(&db),
/// );
///
/// let user_service = registry.resolve(&users).unwrap();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceRegistry {
    config: RegistryConfig,
    registry: RefCell<Registry>,
    resolving: ResolutionStack,
    next_serial: Cell<u64>,
}

impl ServiceRegistry {
    /// Creates an empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            registry: RefCell::new(Registry::new()),
            resolving: ResolutionStack::new(),
            next_serial: Cell::new(0),
        }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ----- Registration -----

    /// Registers (or replaces) the factory for `token`.
    ///
    /// The factory receives the services listed in `options` as positional
    /// [`Dependencies`]. Replacing an existing registration drops its cached
    /// instance without disposing it, unless the registry was configured with
    /// `dispose_on_overwrite`.
    pub fn register<T, F>(&self, token: &Token<T>, factory: F, options: ServiceOptions<T>) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Dependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let ctor: Ctor = Arc::new(move |deps: &Dependencies| -> Result<AnyArc, BoxError> {
            Ok(Arc::new(factory(deps)?))
        });
        self.insert(token.erase(), options.lifetime, options.dependencies, ctor, options.hooks, None);
        self
    }

    /// Registers a factory whose instance is created once and cached.
    pub fn register_singleton<T, F>(&self, token: &Token<T>, factory: F, options: ServiceOptions<T>) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Dependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.register(token, factory, options.lifetime(Lifetime::Singleton))
    }

    /// Registers a scoped factory; cached exactly like a singleton.
    pub fn register_scoped<T, F>(&self, token: &Token<T>, factory: F, options: ServiceOptions<T>) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Dependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.register(token, factory, options.lifetime(Lifetime::Scoped))
    }

    /// Registers a factory invoked on every resolution.
    pub fn register_transient<T, F>(&self, token: &Token<T>, factory: F, options: ServiceOptions<T>) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Dependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.register(token, factory, options.lifetime(Lifetime::Transient))
    }

    /// Registers a pre-built instance as an initialized singleton.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_registry::{ServiceRegistry, Token};
    /// use std::sync::Arc;
    ///
    /// let api_key: Token<String> = Token::new("ApiKey");
    /// let shared = Arc::new("secret".to_string());
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.register_instance(&api_key, shared.clone());
    ///
    /// assert!(Arc::ptr_eq(&registry.resolve(&api_key).unwrap(), &shared));
    /// ```
    pub fn register_instance<T>(&self, token: &Token<T>, instance: impl Into<Arc<T>>) -> &Self
    where
        T: Send + Sync + 'static,
    {
        self.register_instance_with(token, instance, ServiceOptions::new())
    }

    /// Like [`register_instance`](Self::register_instance), keeping the
    /// capabilities declared in `options`.
    ///
    /// The lifetime is always `Singleton` and declared dependencies are
    /// ignored: the instance is never constructed by the registry.
    pub fn register_instance_with<T>(
        &self,
        token: &Token<T>,
        instance: impl Into<Arc<T>>,
        options: ServiceOptions<T>,
    ) -> &Self
    where
        T: Send + Sync + 'static,
    {
        let instance: AnyArc = instance.into();
        let constant = instance.clone();
        let ctor: Ctor = Arc::new(move |_: &Dependencies| -> Result<AnyArc, BoxError> { Ok(constant.clone()) });
        self.insert(token.erase(), Lifetime::Singleton, Vec::new(), ctor, options.hooks, Some(instance));
        self
    }

    fn insert(
        &self,
        token: AnyToken,
        lifetime: Lifetime,
        dependencies: Vec<AnyToken>,
        ctor: Ctor,
        hooks: Hooks,
        instance: Option<AnyArc>,
    ) {
        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);

        let dependency_count = dependencies.len();
        let registration = Registration {
            token,
            lifetime,
            dependencies: dependencies.into(),
            ctor,
            hooks,
            instance,
            serial,
        };

        let replaced = self.registry.borrow_mut().insert(registration);
        match replaced {
            Some(previous) => {
                if self.config.warn_on_overwrite {
                    warn!(
                        registry = self.config.label(),
                        service = token.name(),
                        %lifetime,
                        dropped_instance = previous.is_initialized(),
                        "Service re-registered; previous registration replaced"
                    );
                }
                if self.config.dispose_on_overwrite {
                    lifecycle::dispose_registration(self.config.label(), &previous);
                }
            }
            None => {
                debug!(
                    registry = self.config.label(),
                    service = token.name(),
                    %lifetime,
                    dependencies = dependency_count,
                    "Service registered"
                );
            }
        }
    }

    // ----- Resolution -----

    /// Resolves the service registered under `token`.
    ///
    /// Dependencies are resolved first, in declared order, through this same
    /// path. Fails with `NotFound` for an unregistered token (including an
    /// unregistered dependency, which is reported for the dependency itself),
    /// `Circular` when the token is already being constructed higher up the
    /// chain, and `Construction` when the factory returns an error. Nothing is
    /// cached on failure.
    pub fn resolve<T: Send + Sync + 'static>(&self, token: &Token<T>) -> DiResult<Arc<T>> {
        self.resolve_any(&token.erase())?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Like [`resolve`](Self::resolve), but logs the failure and returns `None`.
    pub fn try_resolve<T: Send + Sync + 'static>(&self, token: &Token<T>) -> Option<Arc<T>> {
        match self.resolve(token) {
            Ok(instance) => Some(instance),
            Err(err) => {
                warn!(
                    registry = self.config.label(),
                    service = token.name(),
                    error = %err,
                    "Optional service unavailable"
                );
                None
            }
        }
    }

    /// Type-erased resolution.
    pub fn resolve_any(&self, token: &AnyToken) -> DiResult<Arc<dyn std::any::Any + Send + Sync>> {
        let (lifetime, dependencies, ctor, serial) = {
            let registry = self.registry.borrow();
            let reg = registry.get(token.id()).ok_or(DiError::NotFound(token.name()))?;
            (reg.lifetime, reg.dependencies.clone(), reg.ctor.clone(), reg.serial)
        };

        let _guard = self.resolving.enter(*token)?;

        if lifetime.is_cached() {
            if let Some(instance) = self.cached(token, serial) {
                return Ok(instance);
            }
        }

        trace!(
            registry = self.config.label(),
            service = token.name(),
            %lifetime,
            depth = self.resolving.depth(),
            "Constructing service"
        );

        let mut resolved = Vec::with_capacity(dependencies.len());
        for dependency in dependencies.iter() {
            resolved.push((*dependency, self.resolve_any(dependency)?));
        }
        let deps = Dependencies::new(token.name(), resolved);

        let instance = ctor(&deps).map_err(|err| DiError::construction(token.name(), err))?;

        if lifetime.is_cached() {
            return Ok(self.store(token, serial, instance));
        }
        Ok(instance)
    }

    fn cached(&self, token: &AnyToken, serial: u64) -> Option<AnyArc> {
        let registry = self.registry.borrow();
        registry
            .get(token.id())
            .filter(|reg| reg.serial == serial)
            .and_then(|reg| reg.instance.clone())
    }

    /// Caches `instance` unless the registration changed while it was being built.
    fn store(&self, token: &AnyToken, serial: u64, instance: AnyArc) -> AnyArc {
        let mut registry = self.registry.borrow_mut();
        match registry.get_mut(token.id()) {
            Some(reg) if reg.serial == serial => match &reg.instance {
                Some(existing) => existing.clone(),
                None => {
                    reg.instance = Some(instance.clone());
                    debug!(
                        registry = self.config.label(),
                        service = token.name(),
                        lifetime = %reg.lifetime,
                        "Service instance cached"
                    );
                    instance
                }
            },
            _ => instance,
        }
    }

    // ----- Introspection -----

    /// Returns true if a registration exists for `token`.
    pub fn is_registered(&self, token: impl Into<AnyToken>) -> bool {
        self.registry.borrow().contains(token.into().id())
    }

    /// Registered tokens in registration order.
    pub fn registered_tokens(&self) -> Vec<AnyToken> {
        self.registry.borrow().iter().map(|reg| reg.token).collect()
    }

    /// Snapshot of the registration for `token`; never constructs the service.
    pub fn descriptor(&self, token: impl Into<AnyToken>) -> Option<ServiceDescriptor> {
        let registry = self.registry.borrow();
        registry.get(token.into().id()).map(|reg| ServiceDescriptor {
            token: reg.token,
            lifetime: reg.lifetime,
            dependencies: reg.dependencies.to_vec(),
            initialized: reg.is_initialized(),
            disposable: reg.hooks.dispose.is_some(),
            ready_checked: reg.hooks.has_ready(),
        })
    }

    /// Counts registrations by lifetime.
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for reg in self.registry.borrow().iter() {
            stats.record(reg.lifetime, reg.is_initialized());
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Audits the whole registration graph without constructing anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
    ///
    /// let a: Token<()> = Token::new("A");
    /// let x: Token<()> = Token::new("X");
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.register(&a, |_| Ok(()), ServiceOptions::new().depends_on(&x));
    ///
    /// let report = registry.validate();
    /// assert!(!report.is_valid());
    /// assert_eq!(report.messages(), vec!["Service A depends on unregistered service X"]);
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let nodes: Vec<(AnyToken, Vec<AnyToken>)> = self
            .registry
            .borrow()
            .iter()
            .map(|reg| (reg.token, reg.dependencies.to_vec()))
            .collect();
        let report = validate_graph(&nodes);
        if !report.is_valid() {
            debug!(
                registry = self.config.label(),
                errors = report.errors.len(),
                "Registry validation found problems"
            );
        }
        report
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Registry Debug ===\n");
        for reg in self.registry.borrow().iter() {
            let deps: Vec<&str> = reg.dependencies.iter().map(AnyToken::name).collect();
            s.push_str(&format!(
                "  {:?}: {} deps=[{}] initialized={}\n",
                reg.token,
                reg.lifetime,
                deps.join(", "),
                reg.is_initialized()
            ));
        }
        s
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ServiceRegistry {
    fn drop(&mut self) {
        let undisposed = self
            .registry
            .get_mut()
            .iter()
            .filter(|reg| reg.is_initialized() && reg.hooks.dispose.is_some())
            .count();
        if undisposed > 0 {
            warn!(
                registry = self.config.label(),
                undisposed,
                "ServiceRegistry dropped with undisposed services. Call clear() before dropping."
            );
        }
    }
}
