//! Error types for flips.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`FlipError`] - Outcomes of a dispatched call that did not produce a value
//! - [`RegistryError`] - Errors from component registries
//! - [`BindingError`] - Errors while building the binding table

use crate::{key::ComponentKey, signal::FeatureNotEnabled};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned when a dispatched call does not produce a value.
///
/// Every variant is terminal for the call that produced it.
#[derive(Error, Debug)]
pub enum FlipError {
    /// No binding exists for the declaring type of the call.
    ///
    /// Calls only reach the dispatcher for bound types, so this is a broken
    /// configuration rather than a runtime condition.
    #[error("no flip declared for `{declaring}`")]
    MissingDeclaration {
        /// Declaring type of the call.
        declaring: ComponentKey,
    },

    /// The alternate could not be obtained from the registry.
    #[error("cannot resolve alternate `{alternate}` for `{declaring}`")]
    Resolution {
        /// Declaring type of the call.
        declaring: ComponentKey,
        /// Alternate type bound to it.
        alternate: ComponentKey,
        /// What the registry reported.
        #[source]
        error: RegistryError,
    },

    /// The alternate is registered but does not implement the capability
    /// the call goes through.
    #[error("alternate `{alternate}` does not implement `{capability}` required by `{operation}`")]
    IncompatibleTarget {
        /// Alternate type bound to the declaring type.
        alternate: ComponentKey,
        /// Capability (trait object) name the call needs.
        capability: &'static str,
        /// Operation that was about to run.
        operation: &'static str,
    },

    /// An implementation raised the disabled signal. Carried untouched.
    #[error(transparent)]
    FeatureDisabled(FeatureNotEnabled),

    /// The alternate implementation failed.
    #[error("`{operation}` failed on alternate `{alternate}`")]
    Invocation {
        /// Alternate type the operation ran on.
        alternate: ComponentKey,
        /// Operation name.
        operation: &'static str,
        /// The error the alternate returned.
        #[source]
        cause: BoxError,
    },

    /// The original implementation failed on the non-flipped path.
    #[error(transparent)]
    Proceed(BoxError),
}

/// Fieldless discriminant of [`FlipError`], for branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipErrorKind {
    /// [`FlipError::MissingDeclaration`]
    ConfigurationIntegrity,
    /// [`FlipError::Resolution`]
    RedirectResolution,
    /// [`FlipError::IncompatibleTarget`]
    RedirectTargetIncompatible,
    /// [`FlipError::FeatureDisabled`]
    FeatureDisabled,
    /// [`FlipError::Invocation`]
    RedirectInvocation,
    /// [`FlipError::Proceed`]
    Proceed,
}

impl FlipError {
    /// The kind of this error.
    pub fn kind(&self) -> FlipErrorKind {
        match self {
            FlipError::MissingDeclaration { .. } => FlipErrorKind::ConfigurationIntegrity,
            FlipError::Resolution { .. } => FlipErrorKind::RedirectResolution,
            FlipError::IncompatibleTarget { .. } => FlipErrorKind::RedirectTargetIncompatible,
            FlipError::FeatureDisabled(_) => FlipErrorKind::FeatureDisabled,
            FlipError::Invocation { .. } => FlipErrorKind::RedirectInvocation,
            FlipError::Proceed(_) => FlipErrorKind::Proceed,
        }
    }

    /// The error raised by the implementation that ran, if one ran and failed
    /// with something other than the disabled signal.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            FlipError::Invocation { cause, .. } => Some(cause.as_ref()),
            FlipError::Proceed(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }

    /// The disabled signal, if that is what this error carries.
    pub fn feature_disabled(&self) -> Option<&FeatureNotEnabled> {
        match self {
            FlipError::FeatureDisabled(signal) => Some(signal),
            _ => None,
        }
    }

    /// True when the redirect machinery itself broke (as opposed to an
    /// implementation reporting a failure).
    pub fn is_redirect_fault(&self) -> bool {
        matches!(
            self.kind(),
            FlipErrorKind::RedirectResolution | FlipErrorKind::RedirectTargetIncompatible
        )
    }
}

impl FlipError {
    /// Box this error for a capability method returning [`BoxError`].
    ///
    /// The disabled signal is boxed as the bare [`FeatureNotEnabled`], so
    /// the caller of a decorated method can downcast to it and an outer
    /// dispatcher still recognizes it. Every other variant is boxed as is.
    pub fn into_box_error(self) -> BoxError {
        match self {
            FlipError::FeatureDisabled(signal) => Box::new(signal),
            other => Box::new(other),
        }
    }
}

impl From<FeatureNotEnabled> for FlipError {
    fn from(signal: FeatureNotEnabled) -> Self {
        FlipError::FeatureDisabled(signal)
    }
}

/// Errors that can occur in a component registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Nothing is registered under the key.
    #[error("no component registered for `{0}`")]
    NotRegistered(ComponentKey),

    /// A component with this key is already registered.
    #[error("component `{0}` is already registered")]
    AlreadyRegistered(ComponentKey),

    /// The component is registered but not as the requested capability.
    #[error("component `{key}` is not registered as `{capability}`")]
    MissingCapability {
        /// Key of the registered component.
        key: ComponentKey,
        /// Capability (trait object) name that was requested.
        capability: &'static str,
    },

    /// A component name is already taken by another component.
    #[error("component name `{0}` is already in use")]
    NameInUse(String),

    /// A custom registry error.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while building a binding table.
#[derive(Error, Debug)]
pub enum BindingError {
    /// The same source type was bound twice.
    #[error("source `{0}` is already bound")]
    DuplicateSource(ComponentKey),

    /// A configured name matches no registered component.
    #[error("unknown component `{0}`")]
    UnknownComponent(String),
}

// Convenience conversions
impl From<BoxError> for RegistryError {
    fn from(err: BoxError) -> Self {
        RegistryError::Custom(err)
    }
}
