//! The main process for communicating over IRC.
use std::sync::Arc;

use futures::stream::StreamExt;
use irc::client::prelude::Client;
use irc::proto::Message;
use tracing::{debug, error};

use crate::Error;
use crate::Registry;
use crate::config::Config;
use crate::context::Context;
use crate::storage::BagStore;

/// The IRC bot that connects to a server and dispatches messages to its plugins.
pub struct Holdbot {
    /// The plugins that handle messages
    registry: Registry,
    /// The shared context for plugins
    context: Arc<Context>,
}

impl Holdbot {
    /// Creates a new bot that keeps its bags in `store`.
    ///
    /// This registers the plugins but doesn't connect yet. Call [`Holdbot::run`] to start the
    /// bot.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn BagStore>) -> Self {
        let context = Arc::new(Context::new(config, store));
        let registry = Registry::preloaded(&context);

        Holdbot { registry, context }
    }

    /// Connects to the server and processes messages until the connection ends.
    ///
    /// # Errors
    ///
    /// - [`Error::IrcClient`] if the IRC client could not be created, e.g. because the server is
    ///   unreachable.
    /// - [`Error::IrcRegistration`] if the registration could not be sent.
    /// - [`Error::Irc`] if a protocol or communication error occurred.
    ///
    /// Errors returned by plugins are logged and don't stop the bot.
    pub async fn run(&self) -> Result<(), Error> {
        let mut client = Client::from_config(self.context.config.irc.clone().into())
            .await
            .map_err(Error::IrcClient)?;

        client.identify().map_err(Error::IrcRegistration)?;

        let mut stream = client.stream()?;

        while let Some(message) = stream.next().await.transpose()? {
            self.handle_message(&client, &message).await;
        }

        Ok(())
    }

    /// Dispatches a single message to every registered plugin.
    async fn handle_message(&self, client: &Client, message: &Message) {
        debug!(?message, "processing irc message");

        for (name, plugin) in &self.registry.plugins {
            if let Err(err) = plugin.handle_message(&self.context, client, message).await {
                error!(plugin = %name, %err, "plugin failed to handle message");
            }
        }
    }
}
