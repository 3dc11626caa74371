use irc::client::Client;

use crate::Error;

/// The channel through which plugins talk back.
pub trait Outbox: Send + Sync {
    /// The nickname the bot currently goes by.
    fn nickname(&self) -> &str;

    /// Sends `text` as a plain message to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Irc`] if the message could not be queued.
    fn say(&self, target: &str, text: &str) -> Result<(), Error>;

    /// Sends `text` as a CTCP `ACTION` (a `/me` message) to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Irc`] if the message could not be queued.
    fn act(&self, target: &str, text: &str) -> Result<(), Error>;
}

impl Outbox for Client {
    fn nickname(&self) -> &str {
        self.current_nickname()
    }

    fn say(&self, target: &str, text: &str) -> Result<(), Error> {
        Ok(self.send_privmsg(target, text)?)
    }

    fn act(&self, target: &str, text: &str) -> Result<(), Error> {
        Ok(self.send_action(target, text)?)
    }
}
