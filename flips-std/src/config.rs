//! Declarative bindings loaded from configuration.
//!
//! Bindings can be declared in TOML and overridden through `FLIPS_`-prefixed
//! environment variables:
//!
//! ```toml
//! [[bindings]]
//! source = "source_mapper"
//! alternate = "target_mapper"
//! enabled = true
//! ```
//!
//! Names are resolved once, against the components registered in a
//! [`Container`]: either the name given with `Component::builder(..).named(..)`
//! or the full type name of the implementation.

use crate::{
    bindings::{FlipBindings, FlipBindingsBuilder},
    container::Container,
};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use flips_core::{BindingError, ComponentKey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FLIPS_";

/// Errors raised while loading bindings from configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration could not be read or parsed.
    #[error("failed to load flip configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// The configuration names something that is not registered.
    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

/// Root of the flip configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipsConfig {
    /// Declared bindings.
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

/// One configured binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Name of the source component.
    pub source: String,
    /// Name of the alternate component.
    pub alternate: String,
    /// A disabled binding keeps calls on the source.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl FlipsConfig {
    /// The figment used by [`FlipsConfig::load`]: the TOML file at `path`
    /// merged with `FLIPS_` environment variables.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from a TOML file plus environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(Figment::new().merge(Toml::string(toml)).extract()?)
    }
}

impl FlipBindingsBuilder {
    /// Add every binding in `config`, resolving names against `container`.
    pub fn configured(
        mut self,
        config: &FlipsConfig,
        container: &Container,
    ) -> Result<Self, BindingError> {
        for entry in &config.bindings {
            let source = lookup(container, &entry.source)?;
            let alternate = if entry.enabled {
                lookup(container, &entry.alternate)?
            } else {
                #[cfg(feature = "tracing")]
                tracing::info!(source = %source, alternate = %entry.alternate, "flip disabled by configuration");
                source
            };
            self.bind_keys_mut(source, alternate);
        }
        Ok(self)
    }
}

impl FlipBindings {
    /// Build a binding table from configuration alone.
    pub fn from_config(config: &FlipsConfig, container: &Container) -> Result<Self, BindingError> {
        FlipBindings::builder().configured(config, container)?.build()
    }
}

fn lookup(container: &Container, name: &str) -> Result<ComponentKey, BindingError> {
    container
        .key_for_name(name)
        .ok_or_else(|| BindingError::UnknownComponent(name.to_string()))
}
