//! Plugin interface for holdbot.
//!
//! Plugins receive every IRC message the bot sees and answer through an [`Outbox`], which the
//! IRC client implements and tests can replace with a recorder.

mod error;
mod outbox;
mod plugin;
mod types;

pub use error::Error;
pub use outbox::Outbox;
pub use plugin::Plugin;
pub use types::{Author, Name, Version};
