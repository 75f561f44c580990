//! Handler registry
//!
//! This module provides the ordered collection of format handlers consulted by the Markdown
//! parser and serializer. Handlers are kept sorted ascending by priority; handlers sharing a
//! priority keep their registration order.

use crate::error::ConfigurationError;
use crate::handler::Handler;
use crate::handlers;
use tracing::debug;

/// Registry of Markdown handlers
///
/// Handlers are additive: once registered they stay for the lifetime of the registry.
///
/// # Examples
///
/// ```ignore
/// let mut registry = HandlerRegistry::new();
/// registry.register(Handler::new("table").with_priority(40).with_block_parser(table))?;
///
/// for handler in registry.iter() {
///     println!("{} ({})", handler.name(), handler.priority());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        HandlerRegistry {
            handlers: Vec::new(),
        }
    }

    /// Register a handler
    ///
    /// The handler is inserted after every handler whose priority is lower than or equal to its
    /// own. Empty and duplicate names are rejected and leave the registry untouched.
    pub fn register(&mut self, handler: Handler) -> Result<(), ConfigurationError> {
        if handler.name().trim().is_empty() {
            return Err(ConfigurationError::MissingName);
        }
        if self.has(handler.name()) {
            return Err(ConfigurationError::DuplicateName(handler.name().to_string()));
        }

        let position = self
            .handlers
            .iter()
            .position(|existing| existing.priority() > handler.priority())
            .unwrap_or(self.handlers.len());
        debug!(
            name = handler.name(),
            priority = handler.priority(),
            position,
            "registered handler"
        );
        self.handlers.insert(position, handler);
        Ok(())
    }

    /// All handlers in priority order (a copy; the registry's order cannot be changed through it)
    pub fn handlers(&self) -> Vec<Handler> {
        self.handlers.clone()
    }

    /// Iterate the handlers in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter()
    }

    /// Get a handler by name
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.iter().find(|h| h.name() == name)
    }

    /// Check if a handler exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Handler names in priority order
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(Handler::name).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Create a registry with the standard handlers (table, diagram, code, math)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for handler in handlers::standard_handlers(&handlers::DiagramSettings::default()) {
            // Standard names are distinct, so registration cannot fail.
            if let Err(err) = registry.register(handler) {
                tracing::warn!(%err, "skipping standard handler");
            }
        }
        registry
    }
}
