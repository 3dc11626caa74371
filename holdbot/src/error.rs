//! Error types

use miette::Diagnostic;
use thiserror::Error;

use crate::storage;

/// Application errors for configuration, storage, IRC, and plugin operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration could not be loaded.
    #[error("Could not load configuration")]
    #[diagnostic(help("check the config file and any HOLDBOT_ environment variables"))]
    Config(#[source] Box<figment::Error>),
    /// The storage backend could not be opened.
    #[error("Could not open storage")]
    Storage(#[from] storage::Error),
    /// Failed to create the IRC client.
    #[error("Could not create IRC client")]
    IrcClient(#[source] irc::error::Error),
    /// Failed to register with the IRC server.
    #[error("Could not send registration details for IRC")]
    IrcRegistration(#[source] irc::error::Error),
    /// General IRC communication error.
    #[error("IRC error")]
    Irc(#[from] irc::error::Error),
    /// Plugin system error.
    #[error("Plugin error")]
    Plugin(#[from] holdbot_plugin::Error),
}
