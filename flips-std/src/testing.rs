//! Testing utilities for flips.
//!
//! This module provides utilities to make testing dispatch setups easier.
//!
//! # Features
//!
//! - [`RecordingRegistry`]: A registry wrapper that records every resolve request
//! - [`FailingRegistry`]: A registry whose resolves always fail
//! - [`CallCounter`]: A shared counter for checking which implementation ran

use flips_core::{BoxError, Component, ComponentKey, ComponentRegistry, RegistryError};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Registry
// ============================================================================

/// A registry wrapper that records every key it is asked to resolve.
///
/// # Example
///
/// ```rust,ignore
/// let registry = Arc::new(RecordingRegistry::new(container));
/// let dispatcher = FlipDispatcher::new(bindings, registry.clone());
///
/// dispatcher.handle(call)?;
///
/// assert_eq!(registry.count_for(&ComponentKey::of::<TargetMapper>()), 1);
/// ```
pub struct RecordingRegistry<R> {
    inner: R,
    requests: Mutex<Vec<ComponentKey>>,
}

impl<R> RecordingRegistry<R> {
    /// Wrap `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped registry.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Keys requested so far, in order.
    pub fn requests(&self) -> Vec<ComponentKey> {
        self.log().clone()
    }

    /// Total number of resolve requests.
    pub fn count(&self) -> usize {
        self.log().len()
    }

    /// Number of resolve requests for `key`.
    pub fn count_for(&self, key: &ComponentKey) -> usize {
        self.log()
            .iter()
            .filter(|k| *k == key)
            .count()
    }

    /// Forget all recorded requests.
    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<ComponentKey>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: ComponentRegistry> ComponentRegistry for RecordingRegistry<R> {
    fn resolve(&self, key: &ComponentKey) -> Result<Component, RegistryError> {
        self.log().push(*key);
        self.inner.resolve(key)
    }
}

// ============================================================================
// Failing Registry
// ============================================================================

/// A registry whose every resolve fails with a custom error.
pub struct FailingRegistry {
    message: String,
}

impl FailingRegistry {
    /// Fail every resolve with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ComponentRegistry for FailingRegistry {
    fn resolve(&self, _key: &ComponentKey) -> Result<Component, RegistryError> {
        let error: BoxError = self.message.clone().into();
        Err(RegistryError::Custom(error))
    }
}

// ============================================================================
// Call Counter
// ============================================================================

/// A shared invocation counter.
///
/// Clones share the same count, so a test can keep one handle and give
/// another to the implementation under test.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Create a new counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}
