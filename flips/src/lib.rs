//! # flips - Feature Flips for Capability Traits
//!
//! `flips` routes each call on a flippable component to one of two
//! implementations: the original (source) or a configured alternate resolved
//! from a registry. Routing is decided per call from a binding table that is
//! frozen at startup, while the registry behind it may change at any time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flips::prelude::*;
//!
//! trait Mapper: Send + Sync {
//!     fn map(&self, input: &str) -> Result<String, BoxError>;
//! }
//!
//! let container = Container::builder()
//!     .component(Component::builder(TargetMapper).expose::<dyn Mapper>(|c| c).build())
//!     .build()?;
//! let bindings = FlipBindings::builder()
//!     .bind::<SourceMapper, TargetMapper>()
//!     .build()?;
//! let dispatcher = Arc::new(FlipDispatcher::new(bindings, Arc::new(container)));
//!
//! let mapper = Flippable::<dyn Mapper>::new::<SourceMapper>(Arc::new(SourceMapper), dispatcher);
//! let out = mapper.invoke("map", |m| m.map("x"))?; // runs on TargetMapper
//! ```
//!
//! ## Error handling
//!
//! Every outcome that is not a value is a [`FlipError`]. Use
//! [`FlipError::kind`] to tell configuration faults, redirect faults and the
//! [`FeatureNotEnabled`] signal apart.

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use flips_core::{
    // Errors
    BindingError,
    BoxError,
    // Dispatch
    Call,
    // Registry
    Component,
    ComponentBuilder,
    ComponentKey,
    ComponentRegistry,
    DynRegistry,
    FeatureNotEnabled,
    FlipError,
    FlipErrorKind,
    RegistryError,
    Route,
};

pub use flips_std::{
    bindings::{FlipBindings, FlipBindingsBuilder},
    container::{Container, ContainerBuilder},
    decorator::Flippable,
    dispatch::FlipDispatcher,
};

/// Configuration-declared bindings.
#[cfg(feature = "config")]
pub mod config {
    pub use flips_std::config::{BindingConfig, ConfigError, ENV_PREFIX, FlipsConfig};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use flips_std::testing::*;
}

/// Prelude module - common imports for flips.
///
/// # Usage
///
/// ```rust,ignore
/// use flips::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Call, Component, ComponentKey, ComponentRegistry, Container, FeatureNotEnabled,
        FlipBindings, FlipDispatcher, FlipError, FlipErrorKind, Flippable,
    };
    pub use std::sync::Arc;
}

#[cfg(feature = "inventory")]
pub use flips_std::{bindings::CollectedBinding, flip_with, inventory};
