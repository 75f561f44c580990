//! Shared configuration loader for the twinmark toolchain.
//!
//! `defaults/twinmark.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TwinmarkConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use twinmark_engine::handlers::{self, DiagramFormat, DiagramSettings};
use twinmark_engine::{ConfigurationError, HandlerRegistry, HistoryManager};

const DEFAULT_TOML: &str = include_str!("../defaults/twinmark.default.toml");

/// Top-level configuration consumed by twinmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TwinmarkConfig {
    pub history: HistoryConfig,
    pub handlers: HandlersConfig,
    pub diagram: DiagramConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub max_size: usize,
}

/// Which built-in handlers get registered.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlersConfig {
    pub table: bool,
    pub diagram: bool,
    pub code: bool,
    pub math: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagramConfig {
    pub server_url: String,
    pub format: DiagramFormat,
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl From<&DiagramConfig> for DiagramSettings {
    fn from(config: &DiagramConfig) -> Self {
        DiagramSettings {
            server_url: config.server_url.clone(),
            proxy_url: config.proxy_url.clone().filter(|url| !url.is_empty()),
            format: config.format,
        }
    }
}

impl TwinmarkConfig {
    /// Build a handler registry with the enabled built-in handlers.
    pub fn registry(&self) -> Result<HandlerRegistry, ConfigurationError> {
        let mut registry = HandlerRegistry::new();
        if self.handlers.table {
            registry.register(handlers::table())?;
        }
        if self.handlers.diagram {
            registry.register(handlers::diagram(&DiagramSettings::from(&self.diagram)))?;
        }
        if self.handlers.code {
            registry.register(handlers::code())?;
        }
        if self.handlers.math {
            registry.register(handlers::math())?;
        }
        Ok(registry)
    }

    pub fn history(&self) -> HistoryManager {
        HistoryManager::new(self.history.max_size)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TwinmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TwinmarkConfig, ConfigError> {
    Loader::new().build()
}
