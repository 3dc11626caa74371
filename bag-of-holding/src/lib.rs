//! A bag of holding: channel members deposit and retrieve whimsical items from a bag with a
//! limited capacity, and the bag makes room for new items by dropping random old ones.
//!
//! The crate knows nothing about IRC. [`Bag`] implements the game rules on top of an
//! [`Inventory`] loaded by the caller, [`gift`] recognizes items being handed to the bot, and
//! [`response`] turns outcomes into chat lines.

// Allow repetition of structure name instead of replacing with self as the output from
// rust-analyzer becomes more readable
#![allow(clippy::use_self)]

mod bag;
mod error;
pub mod gift;
mod random;
pub mod response;

pub use bag::{Bag, Combined, Conjure, Inventory, Transmogrified, TEA, weight_of};
pub use error::{Error, Shortfall};
pub use gift::parse_gift_message;
pub use random::RandomSource;
