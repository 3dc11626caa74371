//! An IRC bot that carries a bag of holding for every channel it's in.

mod bot;
pub mod command;
pub mod config;
pub mod consts;
mod context;
mod error;
pub mod plugin;
pub mod storage;
pub mod telemetry;

pub use bot::Holdbot;
pub use config::Config;
pub use context::Context;
pub use error::Error;
pub use plugin::Registry;
