//! Registered components and their capability views.

use crate::key::ComponentKey;
use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

type View = Box<dyn Any + Send + Sync>;

struct Inner {
    key: ComponentKey,
    name: Option<String>,
    // capability type id -> (capability name, Arc<C>)
    views: HashMap<TypeId, (&'static str, View)>,
}

/// A shared instance together with the capabilities it was registered as.
///
/// Cloning is cheap and shares the instance. Whoever resolves a component
/// borrows it; the registry that handed it out stays the owner.
#[derive(Clone)]
pub struct Component {
    inner: Arc<Inner>,
}

impl Component {
    /// Start building a component around `instance`.
    pub fn builder<T: Send + Sync + 'static>(instance: T) -> ComponentBuilder<T> {
        Self::from_arc(Arc::new(instance))
    }

    /// Start building a component around an already shared instance.
    pub fn from_arc<T: Send + Sync + 'static>(instance: Arc<T>) -> ComponentBuilder<T> {
        ComponentBuilder {
            instance,
            name: None,
            views: HashMap::new(),
        }
    }

    /// Key of the implementation type.
    pub fn key(&self) -> ComponentKey {
        self.inner.key
    }

    /// Registered name, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// View the instance as capability `C`.
    ///
    /// Returns `None` when the component was not registered as `C`.
    pub fn view<C: ?Sized + 'static>(&self) -> Option<Arc<C>> {
        self.inner
            .views
            .get(&TypeId::of::<C>())
            .and_then(|(_, view)| view.downcast_ref::<Arc<C>>())
            .cloned()
    }

    /// Whether the component was registered as capability `C`.
    pub fn provides<C: ?Sized + 'static>(&self) -> bool {
        self.inner.views.contains_key(&TypeId::of::<C>())
    }

    /// Names of all capabilities, including the concrete type itself.
    pub fn capabilities(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.views.values().map(|(name, _)| *name)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities: Vec<_> = self.capabilities().collect();
        capabilities.sort_unstable();
        f.debug_struct("Component")
            .field("key", &self.inner.key)
            .field("name", &self.inner.name)
            .field("capabilities", &capabilities)
            .finish()
    }
}

/// Builder for [`Component`].
///
/// # Example
///
/// ```rust,ignore
/// let component = Component::builder(TargetMapper)
///     .named("target_mapper")
///     .expose::<dyn Mapper>(|c| c)
///     .build();
/// ```
pub struct ComponentBuilder<T> {
    instance: Arc<T>,
    name: Option<String>,
    views: HashMap<TypeId, (&'static str, View)>,
}

impl<T: Send + Sync + 'static> ComponentBuilder<T> {
    /// Give the component a name that configuration can refer to.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Expose the instance as capability `C`.
    ///
    /// `view` performs the unsizing, which is usually just `|c| c`.
    pub fn expose<C>(mut self, view: impl FnOnce(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let shared: Arc<C> = view(self.instance.clone());
        self.views
            .insert(TypeId::of::<C>(), (type_name::<C>(), Box::new(shared)));
        self
    }

    /// Finish the component. The concrete type is always exposed as well.
    pub fn build(mut self) -> Component {
        self.views.insert(
            TypeId::of::<T>(),
            (type_name::<T>(), Box::new(self.instance.clone())),
        );
        Component {
            inner: Arc::new(Inner {
                key: ComponentKey::of::<T>(),
                name: self.name,
                views: self.views,
            }),
        }
    }
}
