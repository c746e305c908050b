//! # Component registry
//!
//! The one thing the dispatcher needs from a dependency-injection container:
//! "give me the instance registered for this implementation type". Any
//! container, service locator or hand-written factory map can sit behind it.

use crate::{component::Component, error::RegistryError, key::ComponentKey};
use std::sync::Arc;

/// Resolves registered components by implementation type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `ComponentRegistry`",
    label = "missing `ComponentRegistry` implementation",
    note = "Registries must implement `resolve` to hand out components by key."
)]
pub trait ComponentRegistry: Send + Sync {
    /// Resolve the component registered under `key`.
    fn resolve(&self, key: &ComponentKey) -> Result<Component, RegistryError>;
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for &R {
    fn resolve(&self, key: &ComponentKey) -> Result<Component, RegistryError> {
        (**self).resolve(key)
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for Arc<R> {
    fn resolve(&self, key: &ComponentKey) -> Result<Component, RegistryError> {
        (**self).resolve(key)
    }
}

impl<R: ComponentRegistry + ?Sized> ComponentRegistry for Box<R> {
    fn resolve(&self, key: &ComponentKey) -> Result<Component, RegistryError> {
        (**self).resolve(key)
    }
}

/// Shared, type-erased registry.
pub type DynRegistry = Arc<dyn ComponentRegistry>;
