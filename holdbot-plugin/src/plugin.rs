use async_trait::async_trait;
use irc::proto::Message;

use crate::{Author, Error, Name, Outbox, Version};

/// The base trait that all plugins must implement.
///
/// `C` is the context the host shares with every plugin, such as configuration and storage.
#[async_trait]
pub trait Plugin<C = ()>: Send + Sync {
    /// The constructor for a new plugin.
    fn new(ctx: &C) -> Self
    where
        Self: Sized;

    /// Returns the name of the plugin.
    fn name() -> Name
    where
        Self: Sized;

    /// Returns the author of the plugin.
    fn author() -> Author
    where
        Self: Sized;

    /// Returns the version of the plugin.
    fn version() -> Version
    where
        Self: Sized;

    /// Handles an IRC protocol message, replying through `outbox`.
    async fn handle_message(
        &self,
        _ctx: &C,
        _outbox: &dyn Outbox,
        _message: &Message,
    ) -> Result<(), Error> {
        Ok(())
    }
}
