//! In-memory component registry.
//!
//! [`Container`] is a small thread-safe registry keyed by implementation
//! type. Components can be added and removed while the application runs;
//! every resolve sees the current contents.

use flips_core::{Component, ComponentKey, ComponentRegistry, RegistryError};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[derive(Default)]
struct Entries {
    by_key: HashMap<ComponentKey, Component>,
    by_name: HashMap<String, ComponentKey>,
}

/// A thread-safe registry of components.
#[derive(Default)]
pub struct Container {
    entries: RwLock<Entries>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Register a component.
    ///
    /// Fails if the implementation type or the component's name is already
    /// registered.
    pub fn register(&self, component: Component) -> Result<(), RegistryError> {
        let mut entries = self.write();
        let key = component.key();
        if entries.by_key.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(key));
        }
        if let Some(name) = component.name() {
            if entries.by_name.contains_key(name) {
                return Err(RegistryError::NameInUse(name.to_string()));
            }
            entries.by_name.insert(name.to_string(), key);
        }
        entries.by_key.insert(key, component);
        Ok(())
    }

    /// Remove a component, returning it if it was registered.
    pub fn unregister(&self, key: &ComponentKey) -> Option<Component> {
        let mut entries = self.write();
        let removed = entries.by_key.remove(key)?;
        if let Some(name) = removed.name() {
            entries.by_name.remove(name);
        }
        Some(removed)
    }

    /// Whether a component is registered under `key`.
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.read().by_key.contains_key(key)
    }

    /// Find a component key by registered name, falling back to the full
    /// type name of the implementation.
    pub fn key_for_name(&self, name: &str) -> Option<ComponentKey> {
        let entries = self.read();
        entries.by_name.get(name).copied().or_else(|| {
            entries
                .by_key
                .keys()
                .find(|key| key.name() == name)
                .copied()
        })
    }

    /// Keys of all registered components.
    pub fn keys(&self) -> Vec<ComponentKey> {
        self.read().by_key.keys().copied().collect()
    }

    /// Get the number of registered components.
    pub fn len(&self) -> usize {
        self.read().by_key.len()
    }

    /// Check if the container is empty.
    pub fn is_empty(&self) -> bool {
        self.read().by_key.is_empty()
    }

    // A panic while holding the lock cannot leave the maps half-updated,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ComponentRegistry for Container {
    fn resolve(&self, key: &ComponentKey) -> Result<Component, RegistryError> {
        self.read()
            .by_key
            .get(key)
            .cloned()
            .ok_or(RegistryError::NotRegistered(*key))
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.read();
        f.debug_struct("Container")
            .field("components", &entries.by_key.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for constructing a [`Container`].
///
/// # Example
/// ```ignore
/// let container = Container::builder()
///     .component(Component::builder(SourceMapper).expose::<dyn Mapper>(|c| c).build())
///     .component(Component::builder(TargetMapper).expose::<dyn Mapper>(|c| c).build())
///     .build()?;
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    components: Vec<Component>,
}

impl ContainerBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Add a component.
    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Add a component (mutable version).
    pub fn component_mut(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Build the container, rejecting duplicate keys or names.
    pub fn build(self) -> Result<Container, RegistryError> {
        let container = Container::new();
        for component in self.components {
            container.register(component)?;
        }
        Ok(container)
    }
}
