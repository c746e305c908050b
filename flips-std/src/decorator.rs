//! # Explicit decoration
//!
//! Flippable operations are called through a thin wrapper instead of being
//! intercepted behind the caller's back. [`Flippable`] holds the source
//! instance, the type it was declared on and a shared dispatcher; the
//! application implements its capability trait on a newtype that forwards
//! each method through [`Flippable::invoke`]. Failures are boxed with
//! [`FlipError::into_box_error`] so the disabled signal reaches the caller
//! as a bare [`FeatureNotEnabled`](flips_core::FeatureNotEnabled).
//!
//! ```rust,ignore
//! struct FlippedMapper(Flippable<dyn Mapper>);
//!
//! impl Mapper for FlippedMapper {
//!     fn map(&self, input: &str) -> Result<String, BoxError> {
//!         self.0
//!             .invoke("map", |m| m.map(input))
//!             .map_err(FlipError::into_box_error)
//!     }
//! }
//! ```

use crate::{container::Container, dispatch::FlipDispatcher};
use flips_core::{BoxError, Call, ComponentKey, ComponentRegistry, FlipError, RegistryError};
use std::sync::Arc;

/// A source instance whose calls go through a [`FlipDispatcher`].
pub struct Flippable<C: ?Sized, R: ?Sized = Container> {
    source: Arc<C>,
    declaring: ComponentKey,
    dispatcher: Arc<FlipDispatcher<R>>,
}

impl<C, R> Flippable<C, R>
where
    C: ?Sized + 'static,
    R: ComponentRegistry + ?Sized,
{
    /// Wrap `source`, an instance of `S` viewed as capability `C`.
    ///
    /// `S` must be the concrete type behind `source`: it is the key the
    /// binding table is consulted with, and nothing checks it against the
    /// instance. Prefer [`Flippable::from_registry`] when the source is
    /// registered.
    pub fn new<S: 'static>(source: Arc<C>, dispatcher: Arc<FlipDispatcher<R>>) -> Self {
        Self {
            source,
            declaring: ComponentKey::of::<S>(),
            dispatcher,
        }
    }

    /// Resolve the source instance of type `S` from the dispatcher's registry.
    pub fn from_registry<S: 'static>(dispatcher: Arc<FlipDispatcher<R>>) -> Result<Self, RegistryError> {
        let declaring = ComponentKey::of::<S>();
        let component = dispatcher.registry().resolve(&declaring)?;
        let source = component
            .view::<C>()
            .ok_or(RegistryError::MissingCapability {
                key: declaring,
                capability: std::any::type_name::<C>(),
            })?;
        Ok(Self {
            source,
            declaring,
            dispatcher,
        })
    }

    /// Run `operation` through the dispatcher.
    pub fn invoke<T, F>(&self, operation: &'static str, op: F) -> Result<T, FlipError>
    where
        F: FnOnce(&C) -> Result<T, BoxError>,
    {
        let call = Call::new(self.declaring, &*self.source, operation, op);
        self.dispatcher.handle(call)
    }

    /// Key of the declaring type.
    pub fn declaring(&self) -> ComponentKey {
        self.declaring
    }

    /// The wrapped source instance.
    pub fn source(&self) -> &Arc<C> {
        &self.source
    }

    /// The dispatcher calls go through.
    pub fn dispatcher(&self) -> &Arc<FlipDispatcher<R>> {
        &self.dispatcher
    }
}

impl<C: ?Sized, R: ?Sized> Clone for Flippable<C, R> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            declaring: self.declaring,
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<C: ?Sized, R: ?Sized> std::fmt::Debug for Flippable<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flippable")
            .field("declaring", &self.declaring)
            .field("capability", &std::any::type_name::<C>())
            .finish_non_exhaustive()
    }
}
