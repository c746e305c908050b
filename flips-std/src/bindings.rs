//! Binding table: which alternate each source type flips to.
//!
//! Bindings are declared once at startup and frozen into a [`FlipBindings`]
//! that the dispatcher only ever reads.

use flips_core::{BindingError, ComponentKey};
use std::collections::HashMap;

/// Frozen (source → alternate) mapping.
#[derive(Debug, Clone, Default)]
pub struct FlipBindings {
    map: HashMap<ComponentKey, ComponentKey>,
}

impl FlipBindings {
    /// Start a new builder.
    pub fn builder() -> FlipBindingsBuilder {
        FlipBindingsBuilder::new()
    }

    /// The alternate bound to `source`.
    pub fn alternate_for(&self, source: &ComponentKey) -> Option<ComponentKey> {
        self.map.get(source).copied()
    }

    /// Whether `source` has a binding.
    pub fn contains(&self, source: &ComponentKey) -> bool {
        self.map.contains_key(source)
    }

    /// Iterate over all (source, alternate) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKey, ComponentKey)> + '_ {
        self.map.iter().map(|(s, a)| (*s, *a))
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Builder for [`FlipBindings`].
///
/// # Example
/// ```ignore
/// let bindings = FlipBindings::builder()
///     .bind::<SourceMapper, TargetMapper>()
///     .keep::<Clock>()
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct FlipBindingsBuilder {
    entries: Vec<(ComponentKey, ComponentKey)>,
}

impl FlipBindingsBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Flip calls declared on `S` over to `A`.
    pub fn bind<S: ?Sized + 'static, A: ?Sized + 'static>(self) -> Self {
        self.bind_keys(ComponentKey::of::<S>(), ComponentKey::of::<A>())
    }

    /// Declare `S` as flippable but keep calls on `S` itself.
    pub fn keep<S: ?Sized + 'static>(self) -> Self {
        let key = ComponentKey::of::<S>();
        self.bind_keys(key, key)
    }

    /// Bind by key.
    pub fn bind_keys(mut self, source: ComponentKey, alternate: ComponentKey) -> Self {
        self.bind_keys_mut(source, alternate);
        self
    }

    /// Bind by key (mutable version).
    pub fn bind_keys_mut(&mut self, source: ComponentKey, alternate: ComponentKey) {
        self.entries.push((source, alternate));
    }

    /// Add every binding registered with [`flip_with!`](crate::flip_with).
    #[cfg(feature = "inventory")]
    pub fn collected(mut self) -> Self {
        for binding in inventory::iter::<CollectedBinding> {
            self.bind_keys_mut((binding.source)(), (binding.alternate)());
        }
        self
    }

    /// Get the number of declared bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the table. A source declared twice is rejected.
    pub fn build(self) -> Result<FlipBindings, BindingError> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for (source, alternate) in self.entries {
            if map.insert(source, alternate).is_some() {
                return Err(BindingError::DuplicateSource(source));
            }
        }
        Ok(FlipBindings { map })
    }
}

/// A binding submitted to `inventory` by [`flip_with!`](crate::flip_with).
#[cfg(feature = "inventory")]
pub struct CollectedBinding {
    source: fn() -> ComponentKey,
    alternate: fn() -> ComponentKey,
}

#[cfg(feature = "inventory")]
impl CollectedBinding {
    /// Binding from `S` to `A`.
    pub const fn of<S: 'static, A: 'static>() -> Self {
        Self {
            source: ComponentKey::of::<S>,
            alternate: ComponentKey::of::<A>,
        }
    }
}

#[cfg(feature = "inventory")]
inventory::collect!(CollectedBinding);

/// Declares a binding next to the source type, collected at startup by
/// [`FlipBindingsBuilder::collected`].
///
/// # Example
/// ```rust,ignore
/// flips::flip_with!(SourceMapper => TargetMapper);
/// ```
#[cfg(feature = "inventory")]
#[macro_export]
macro_rules! flip_with {
    ($source:ty => $alternate:ty) => {
        $crate::inventory::submit! {
            $crate::bindings::CollectedBinding::of::<$source, $alternate>()
        }
    };
}
