use std::error::Error as StdError;

use thiserror::Error;

/// An error that occurred while a plugin handled a message.
#[derive(Error, Debug)]
pub enum Error {
    /// Sending a reply over IRC failed.
    #[error("IRC error: {0}")]
    Irc(#[from] irc::error::Error),
    /// The plugin failed for a reason of its own.
    #[error("Plugin error: {0}")]
    Plugin(Box<dyn StdError + Sync + Send>),
}

impl Error {
    /// Wraps a plugin-specific error.
    pub fn plugin(err: impl StdError + Sync + Send + 'static) -> Error {
        Error::Plugin(Box::new(err))
    }
}
