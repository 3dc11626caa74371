use std::fmt;

use thiserror::Error;

/// The smallest number of items that can be combined.
pub(crate) const MIN_COMBINE: usize = 2;

/// Error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation needs at least one item, but the bag is empty.
    #[error("the bag is empty")]
    EmptyBag,
    /// A combination was requested that the bag cannot satisfy.
    #[error("{0}")]
    InsufficientItems(Shortfall),
    /// An item had to be derived from the history, but nothing has been added yet.
    #[error("nothing has ever been put in the bag")]
    EmptyHistory,
}

/// Why a combination could not be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// More items were requested than the bag holds.
    Exceeds {
        /// The number of items in the bag.
        available: usize,
    },
    /// Fewer than [`MIN_COMBINE`] items were requested.
    BelowMinimum,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::Exceeds { available } => {
                write!(f, "I only have {available} things in my bag.")
            }
            Shortfall::BelowMinimum => {
                write!(f, "I can only combine at least two items, no fewer.")
            }
        }
    }
}
