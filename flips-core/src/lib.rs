//! # flips-core
//!
//! Core traits and types for the flips feature-flip dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! application crates that only implement capabilities or registries and do
//! not need the standard implementations in `flips-std`.
//!
//! # Vocabulary
//!
//! - [`ComponentKey`] - identity of an implementation type
//! - [`Call`] - one invocation: declaring type, operation, receiver, bound arguments
//! - [`Component`] - a registered instance and the capabilities it is exposed as
//! - [`ComponentRegistry`] - "resolve the instance for this type"
//! - [`Route`] - proceed with the original, or redirect to the alternate
//! - [`FeatureNotEnabled`] - the signal an implementation raises to refuse a call
//!
//! # Error Types
//!
//! - [`FlipError`] - Dispatch outcomes that are not values
//! - [`RegistryError`] - Registry failures
//! - [`BindingError`] - Binding table construction failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod call;
mod component;
mod error;
mod key;
mod registry;
mod route;
mod signal;

// Re-exports
pub use call::Call;
pub use component::{Component, ComponentBuilder};
pub use error::{BindingError, BoxError, FlipError, FlipErrorKind, RegistryError};
pub use key::ComponentKey;
pub use registry::{ComponentRegistry, DynRegistry};
pub use route::Route;
pub use signal::FeatureNotEnabled;
