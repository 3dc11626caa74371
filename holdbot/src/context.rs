use std::sync::Arc;

use crate::Config;
use crate::storage::BagStore;

/// Shared context for plugin invocations.
pub struct Context {
    /// The bot configuration.
    pub config: Config,
    /// Where bags are persisted.
    pub store: Arc<dyn BagStore>,
}

impl Context {
    /// Creates a new context.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn BagStore>) -> Self {
        Self { config, store }
    }
}
