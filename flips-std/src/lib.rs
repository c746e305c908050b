//! # flips-std
//!
//! Standard implementations for the flips feature-flip dispatcher.
//!
//! This crate provides:
//! - **Binding table**: [`FlipBindings`](bindings::FlipBindings) and its builder
//! - **Registry**: [`Container`](container::Container), a thread-safe in-memory registry
//! - **Dispatch rule**: [`FlipDispatcher`](dispatch::FlipDispatcher)
//! - **Decoration**: [`Flippable`](decorator::Flippable)
//! - **Configuration**: TOML/env declared bindings (`config` feature)
//! - **Distributed declarations**: `flip_with!` (`inventory` feature)

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use flips_core;

// Modules
pub mod bindings;
#[cfg(feature = "config")]
pub mod config;
pub mod container;
pub mod decorator;
pub mod dispatch;
pub mod testing;

#[cfg(feature = "inventory")]
pub use inventory;
