//! Service registration records and the ordered registration table.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::dependencies::Dependencies;
use crate::error::BoxError;
use crate::lifetime::Lifetime;
use crate::token::{AnyToken, TokenId};

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Ctor = Arc<dyn Fn(&Dependencies) -> Result<AnyArc, BoxError> + Send + Sync>;

pub(crate) type DisposeHook = Arc<dyn Fn(&AnyArc) -> Result<(), BoxError> + Send + Sync>;

#[cfg(feature = "async")]
pub(crate) type ReadyFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), BoxError>> + Send>>;

#[cfg(feature = "async")]
pub(crate) type ReadyHook = Arc<dyn Fn(AnyArc) -> ReadyFuture + Send + Sync>;

/// Capability hooks captured at registration, while `T` is still known.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) dispose: Option<DisposeHook>,
    #[cfg(feature = "async")]
    pub(crate) ready: Option<ReadyHook>,
}

impl Hooks {
    pub(crate) fn has_ready(&self) -> bool {
        #[cfg(feature = "async")]
        {
            self.ready.is_some()
        }
        #[cfg(not(feature = "async"))]
        {
            false
        }
    }
}

/// Service registration with lifetime, constructor and cache slot
pub(crate) struct Registration {
    pub(crate) token: AnyToken,
    pub(crate) lifetime: Lifetime,
    pub(crate) dependencies: Arc<[AnyToken]>,
    pub(crate) ctor: Ctor,
    pub(crate) hooks: Hooks,
    /// Cached instance for singleton and scoped lifetimes
    pub(crate) instance: Option<AnyArc>,
    /// Distinguishes this registration from a later one under the same token
    pub(crate) serial: u64,
}

impl Registration {
    pub(crate) fn is_initialized(&self) -> bool {
        self.instance.is_some()
    }
}

/// Registration table keyed by token identity, iterated in registration order.
///
/// Overwriting a token keeps its original position.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<TokenId, Registration>,
    order: Vec<TokenId>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a registration, returning the one it replaced.
    pub(crate) fn insert(&mut self, registration: Registration) -> Option<Registration> {
        let id = registration.token.id();
        let previous = self.entries.insert(id, registration);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    #[inline]
    pub(crate) fn get(&self, id: TokenId) -> Option<&Registration> {
        self.entries.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: TokenId) -> Option<&mut Registration> {
        self.entries.get_mut(&id)
    }

    #[inline]
    pub(crate) fn contains(&self, id: TokenId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn remove(&mut self, id: TokenId) -> Option<Registration> {
        let removed = self.entries.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(removed)
    }

    /// Removes every registration, returned in registration order.
    pub(crate) fn drain(&mut self) -> Vec<Registration> {
        let order = std::mem::take(&mut self.order);
        let mut entries = std::mem::take(&mut self.entries);
        order.into_iter().filter_map(|id| entries.remove(&id)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterator over registrations in registration order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.order.iter().filter_map(move |id| self.entries.get(id))
    }
}
