//! Teardown, eager initialization and readiness for registered services.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info};

use crate::error::DiError;
use crate::lifetime::Lifetime;
use crate::registration::Registration;
use crate::token::AnyToken;

use super::ServiceRegistry;

/// Outcome of [`ServiceRegistry::initialize_all`].
#[derive(Debug, Default)]
pub struct InitializeReport {
    /// Singletons that are constructed after the call, in registration order
    pub initialized: Vec<AnyToken>,
    /// Singletons whose construction failed, with the reason
    pub failures: Vec<(AnyToken, DiError)>,
}

impl InitializeReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl ServiceRegistry {
    /// Removes the registration for `token`, disposing its cached instance.
    ///
    /// Returns whether a registration existed. A failing or panicking
    /// `dispose` is logged and does not prevent the removal.
    pub fn unregister(&self, token: impl Into<AnyToken>) -> bool {
        let token = token.into();
        let removed = self.registry.borrow_mut().remove(token.id());
        match removed {
            Some(registration) => {
                dispose_registration(self.config.label(), &registration);
                debug!(registry = self.config.label(), service = token.name(), "Service unregistered");
                true
            }
            None => false,
        }
    }

    /// Disposes every cached instance and removes all registrations.
    ///
    /// Instances are disposed in reverse registration order, so services are
    /// torn down before the services they were registered after.
    pub fn clear(&self) {
        let drained = self.registry.borrow_mut().drain();
        self.resolving.clear();

        let count = drained.len();
        for registration in drained.iter().rev() {
            dispose_registration(self.config.label(), registration);
        }
        debug!(registry = self.config.label(), removed = count, "Registry cleared");
    }

    /// Eagerly constructs every `Singleton`, in registration order.
    ///
    /// Best-effort: a failure is logged and recorded, and the remaining
    /// singletons are still attempted. Scoped and transient services are
    /// left alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_registry::{ServiceOptions, ServiceRegistry, Token};
    ///
    /// let good: Token<u8> = Token::new("Good");
    /// let bad: Token<u8> = Token::new("Bad");
    ///
    /// let registry = ServiceRegistry::new();
    /// registry.register_singleton(&bad, |_| Err("no network".into()), ServiceOptions::new());
    /// registry.register_singleton(&good, |_| Ok(1), ServiceOptions::new());
    ///
    /// let report = registry.initialize_all();
    /// assert_eq!(report.initialized, vec![good.erase()]);
    /// assert_eq!(report.failures.len(), 1);
    /// assert_eq!(report.failures[0].0, bad.erase());
    /// ```
    pub fn initialize_all(&self) -> InitializeReport {
        let singletons: Vec<AnyToken> = self
            .registry
            .borrow()
            .iter()
            .filter(|reg| reg.lifetime == Lifetime::Singleton)
            .map(|reg| reg.token)
            .collect();

        let mut report = InitializeReport::default();
        for token in singletons {
            match self.resolve_any(&token) {
                Ok(_) => report.initialized.push(token),
                Err(err) => {
                    error!(
                        registry = self.config.label(),
                        service = token.name(),
                        error = %err,
                        "Singleton initialization failed"
                    );
                    report.failures.push((token, err));
                }
            }
        }

        info!(
            registry = self.config.label(),
            initialized = report.initialized.len(),
            failed = report.failures.len(),
            "Singleton initialization finished"
        );
        report
    }
}

/// Invokes the dispose hook of a cached instance, logging any failure.
pub(crate) fn dispose_registration(label: &str, registration: &Registration) {
    let (Some(instance), Some(hook)) = (&registration.instance, &registration.hooks.dispose) else {
        return;
    };
    let service = registration.token.name();

    match panic::catch_unwind(AssertUnwindSafe(|| hook(instance))) {
        Ok(Ok(())) => debug!(registry = label, service, "Service disposed"),
        Ok(Err(err)) => error!(registry = label, service, error = %err, "Dispose failed"),
        Err(payload) => error!(
            registry = label,
            service,
            panic = panic_message(payload.as_ref()),
            "Dispose panicked"
        ),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(feature = "async")]
mod readiness {
    use std::time::{Duration, Instant};

    use tracing::{debug, warn};

    use crate::error::DiError;
    use crate::registry::ServiceRegistry;
    use crate::token::AnyToken;

    /// Readiness check result for a single service.
    #[derive(Debug)]
    pub struct ReadinessResult {
        pub token: AnyToken,
        /// Failure reason, `None` if the check passed
        pub error: Option<DiError>,
        pub duration: Duration,
    }

    impl ReadinessResult {
        pub fn is_ready(&self) -> bool {
            self.error.is_none()
        }
    }

    /// Outcome of [`ServiceRegistry::ready_all`].
    #[derive(Debug, Default)]
    pub struct ReadinessReport {
        pub results: Vec<ReadinessResult>,
    }

    impl ReadinessReport {
        pub fn all_ready(&self) -> bool {
            self.results.iter().all(ReadinessResult::is_ready)
        }

        pub fn failures(&self) -> impl Iterator<Item = &ReadinessResult> {
            self.results.iter().filter(|r| !r.is_ready())
        }
    }

    impl ServiceRegistry {
        /// Awaits the readiness check of every constructed instance that
        /// declared one, in registration order.
        ///
        /// Only instances that already exist are checked; call
        /// [`initialize_all`](Self::initialize_all) first to construct the
        /// singletons. Failures are collected, never propagated.
        pub async fn ready_all(&self) -> ReadinessReport {
            let pending: Vec<_> = self
                .registry
                .borrow()
                .iter()
                .filter_map(|reg| match (&reg.instance, &reg.hooks.ready) {
                    (Some(instance), Some(hook)) => Some((reg.token, instance.clone(), hook.clone())),
                    _ => None,
                })
                .collect();

            let mut report = ReadinessReport::default();
            for (token, instance, hook) in pending {
                let start = Instant::now();
                let outcome = hook(instance).await;
                let duration = start.elapsed();

                let error = match outcome {
                    Ok(()) => {
                        debug!(registry = self.config.label(), service = token.name(), ?duration, "Service ready");
                        None
                    }
                    Err(err) => {
                        warn!(
                            registry = self.config.label(),
                            service = token.name(),
                            error = %err,
                            "Service readiness check failed"
                        );
                        Some(DiError::ReadyCheck {
                            service: token.name(),
                            source: err.into(),
                        })
                    }
                };
                report.results.push(ReadinessResult { token, error, duration });
            }
            report
        }
    }
}

#[cfg(feature = "async")]
pub use readiness::{ReadinessReport, ReadinessResult};
