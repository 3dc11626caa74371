//! Plugins and the registry that owns them.

use holdbot_plugin::Plugin;
use tracing::debug;

use crate::Context;

/// The bag of holding game
pub mod bag;

/// Common includes used in plugins.
#[allow(unused)]
mod prelude {
    pub use crate::Context;
    pub use crate::command::Command as BotCommand;
    pub use async_trait::async_trait;
    pub use holdbot_plugin::{Author, Error as PluginError, Name, Outbox, Plugin, Version};
    pub use irc::proto::{Command, Message};
}

/// A plugin owned by the registry.
pub type BoxedPlugin = Box<dyn Plugin<Context>>;

/// Plugin registry.
#[derive(Default)]
pub struct Registry {
    /// List of loaded plugins along with their names.
    pub plugins: Vec<(&'static str, BoxedPlugin)>,
}

impl Registry {
    /// Constructs and returns a new, empty plugin registry.
    #[must_use]
    pub fn new() -> Registry {
        Registry { plugins: vec![] }
    }

    /// Constructs and returns a new plugin registry with initialized plugins.
    #[must_use]
    pub fn preloaded(ctx: &Context) -> Registry {
        let mut registry = Self::new();
        debug!("registering plugins");

        registry.register::<bag::BagOfHolding>(ctx);

        let num_plugins = registry.plugins.len();
        debug!(%num_plugins, "finished registering plugins");

        registry
    }

    /// Registers a new plugin based on its type.
    pub fn register<P: Plugin<Context> + 'static>(&mut self, ctx: &Context) {
        let name = P::name();
        debug!(%name, author = %P::author(), version = %P::version(), "registering plugin");

        self.plugins.push((name.as_str(), Box::new(P::new(ctx))));
    }
}
