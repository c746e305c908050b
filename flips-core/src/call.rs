//! # Call descriptor
//!
//! A [`Call`] is a snapshot of one invocation of a flippable operation: which
//! implementation type declared it, which operation it is, the receiver it was
//! made on, and the operation itself with its arguments already bound.
//!
//! Operations are expressed against a capability `C` (usually a `dyn Trait`)
//! rather than a concrete type. Any implementation of the capability can
//! therefore run the same operation, which is what lets the dispatcher re-run
//! a call on an alternate implementation without any lookup by name.
//!
//! The bound operation is `FnOnce` and is consumed by [`Call::proceed`] or
//! [`Call::redirect`], so at most one implementation ever runs it.

use crate::{error::BoxError, key::ComponentKey};
use std::fmt;

/// One invocation of an operation declared on capability `C`.
pub struct Call<'a, C: ?Sized, F> {
    declaring: ComponentKey,
    operation: &'static str,
    receiver: &'a C,
    op: F,
}

impl<'a, C: ?Sized, F> Call<'a, C, F> {
    /// Describe a call made on `receiver`, an instance of the type identified
    /// by `declaring`.
    pub fn new<T>(declaring: ComponentKey, receiver: &'a C, operation: &'static str, op: F) -> Self
    where
        F: FnOnce(&C) -> Result<T, BoxError>,
    {
        Self {
            declaring,
            operation,
            receiver,
            op,
        }
    }

    /// Describe a call whose declaring type is `S`.
    pub fn on<S, T>(receiver: &'a C, operation: &'static str, op: F) -> Self
    where
        S: ?Sized + 'static,
        F: FnOnce(&C) -> Result<T, BoxError>,
    {
        Self::new(ComponentKey::of::<S>(), receiver, operation, op)
    }

    /// Run the operation on the original receiver.
    pub fn proceed<T>(self) -> Result<T, BoxError>
    where
        F: FnOnce(&C) -> Result<T, BoxError>,
    {
        (self.op)(self.receiver)
    }

    /// Run the operation on `target` instead of the original receiver.
    pub fn redirect<T>(self, target: &C) -> Result<T, BoxError>
    where
        F: FnOnce(&C) -> Result<T, BoxError>,
    {
        (self.op)(target)
    }

    /// Key of the type that declared the call.
    pub fn declaring(&self) -> ComponentKey {
        self.declaring
    }

    /// Operation name, used in diagnostics.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Name of the capability the call goes through.
    pub fn capability(&self) -> &'static str {
        std::any::type_name::<C>()
    }
}

impl<C: ?Sized, F> fmt::Debug for Call<'_, C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("declaring", &self.declaring)
            .field("operation", &self.operation)
            .field("capability", &self.capability())
            .finish_non_exhaustive()
    }
}
