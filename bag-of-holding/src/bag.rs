//! The bag and its rules.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MIN_COMBINE, Shortfall};
use crate::{Error, RandomSource};

/// The item that is derived when there is no history to derive from.
pub const TEA: &str = "something almost quite but not entirely unlike tea";

/// The persisted state of a single channel's bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inventory {
    /// The items currently in the bag, most recently added first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub contents: Vec<String>,
    /// Every distinct item that has ever been put in the bag, in the order it first appeared.
    #[cfg_attr(feature = "serde", serde(default))]
    pub history: Vec<String>,
}

/// The result of [`Bag::transmogrify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmogrified {
    /// The item that was taken out of the bag.
    pub consumed: String,
    /// The item that took its place.
    pub result: String,
    /// Items that fell out to make room for the result.
    pub dropped: Vec<String>,
}

/// The result of [`Bag::combine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combined {
    /// The items that were taken out of the bag, in the order they were picked.
    pub consumed: Vec<String>,
    /// The item that took their place.
    pub result: String,
    /// Items that fell out to make room for the result.
    pub dropped: Vec<String>,
}

/// The result of [`Bag::conjure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conjure {
    /// An item from the history was put back in the bag.
    Conjured {
        /// The conjured item.
        item: String,
        /// Items that fell out to make room for it.
        dropped: Vec<String>,
    },
    /// The bag is at (or over) capacity, or has no capacity limit, so nothing was conjured.
    Full,
}

/// Returns the weight of a single item, which is its length in characters.
#[must_use]
pub fn weight_of(item: &str) -> usize {
    item.chars().count()
}

/// A channel's bag together with its capacity.
///
/// A capacity of `0` means the bag is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    inventory: Inventory,
    capacity: usize,
}

impl Bag {
    /// Creates a bag from a previously persisted inventory.
    #[must_use]
    pub const fn new(inventory: Inventory, capacity: usize) -> Bag {
        Bag {
            inventory,
            capacity,
        }
    }

    /// Creates an empty bag with the given capacity.
    #[must_use]
    pub fn empty(capacity: usize) -> Bag {
        Bag::new(Inventory::default(), capacity)
    }

    /// Returns the capacity of the bag.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the items in the bag, most recently added first.
    #[must_use]
    pub fn contents(&self) -> &[String] {
        &self.inventory.contents
    }

    /// Returns every distinct item that has ever been added.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.inventory.history
    }

    /// Returns the inventory for persisting.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Consumes the bag and returns its inventory.
    #[must_use]
    pub fn into_inventory(self) -> Inventory {
        self.inventory
    }

    /// Returns the number of items in the bag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inventory.contents.len()
    }

    /// Returns `true` if the bag holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inventory.contents.is_empty()
    }

    /// Returns the total weight of the items in the bag.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.inventory.contents.iter().map(|item| weight_of(item)).sum()
    }

    /// Puts `item` at the front of the bag and returns the items that were dropped to make room
    /// for it.
    ///
    /// Random items are dropped until the new item fits or the bag is empty. The new item itself
    /// is never dropped, so an item heavier than the whole capacity still ends up in the bag.
    pub fn add(&mut self, item: impl Into<String>, rng: &mut impl RandomSource) -> Vec<String> {
        let item = item.into();
        let item_weight = weight_of(&item);
        let mut weight = self.weight();
        let mut dropped = vec![];

        // Each iteration removes one item, so this ends after at most `len()` rounds.
        while self.capacity > 0 && weight + item_weight > self.capacity && !self.is_empty() {
            let evicted = self.take_random(rng);
            weight -= weight_of(&evicted);
            dropped.push(evicted);
        }

        #[cfg(feature = "log")]
        if !dropped.is_empty() {
            tracing::debug!(%item, ?dropped, capacity = self.capacity, "evicted items");
        }

        if !self.inventory.history.contains(&item) {
            self.inventory.history.push(item.clone());
        }

        self.inventory.contents.insert(0, item);

        dropped
    }

    /// Returns a random item from the bag without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBag`] if there's nothing in the bag.
    pub fn pick_random(&self, rng: &mut impl RandomSource) -> Result<&str, Error> {
        rng.choose(&self.inventory.contents)
            .map(String::as_str)
            .ok_or(Error::EmptyBag)
    }

    /// Removes the first occurrence of `item` from the bag and returns whether it was there.
    pub fn remove_specific(&mut self, item: &str) -> bool {
        let contents = &mut self.inventory.contents;

        match contents.iter().position(|x| x == item) {
            Some(idx) => {
                contents.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Turns a random item into something from the history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBag`] if there's nothing to transmogrify.
    pub fn transmogrify(&mut self, rng: &mut impl RandomSource) -> Result<Transmogrified, Error> {
        if self.is_empty() {
            return Err(Error::EmptyBag);
        }

        let consumed = self.take_random(rng);
        let result = self.derive(rng);
        let dropped = self.add(result.clone(), rng);

        Ok(Transmogrified {
            consumed,
            result,
            dropped,
        })
    }

    /// Takes `count` random items out of the bag and combines them into something from the
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientItems`] if the bag holds fewer than `count` items, or if
    /// `count` is less than two. Nothing is removed in either case.
    pub fn combine(
        &mut self,
        count: usize,
        rng: &mut impl RandomSource,
    ) -> Result<Combined, Error> {
        if count > self.len() {
            return Err(Error::InsufficientItems(Shortfall::Exceeds {
                available: self.len(),
            }));
        }

        if count < MIN_COMBINE {
            return Err(Error::InsufficientItems(Shortfall::BelowMinimum));
        }

        let consumed: Vec<String> = (0..count).map(|_| self.take_random(rng)).collect();
        let result = self.derive(rng);
        let dropped = self.add(result.clone(), rng);

        Ok(Combined {
            consumed,
            result,
            dropped,
        })
    }

    /// Brings a random item from the history back into the bag, if there's room for more.
    ///
    /// The bag has room when its weight is below its capacity, so an unbounded bag never
    /// conjures anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHistory`] if there's room but nothing to conjure. The bag is left
    /// untouched.
    pub fn conjure(&mut self, rng: &mut impl RandomSource) -> Result<Conjure, Error> {
        if self.weight() >= self.capacity {
            return Ok(Conjure::Full);
        }

        let item = rng
            .choose(&self.inventory.history)
            .cloned()
            .ok_or(Error::EmptyHistory)?;
        let dropped = self.add(item.clone(), rng);

        Ok(Conjure::Conjured { item, dropped })
    }

    /// Removes and returns a random item. The bag must not be empty.
    fn take_random(&mut self, rng: &mut impl RandomSource) -> String {
        let contents = &mut self.inventory.contents;
        let idx = rng.pick_index(contents.len()).min(contents.len() - 1);

        contents.remove(idx)
    }

    /// Returns a random item from the history, or [`TEA`] when there is none.
    fn derive(&self, rng: &mut impl RandomSource) -> String {
        rng.choose(&self.inventory.history)
            .cloned()
            .unwrap_or_else(|| TEA.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn weight_counts_characters() {
        let bag = Bag::new(
            Inventory {
                contents: vec!["æøå".to_string(), "ab".to_string()],
                history: vec![],
            },
            0,
        );

        assert_eq!(bag.weight(), 5);
        assert_eq!(Bag::empty(10).weight(), 0);
    }

    #[test]
    fn add_prepends_and_records_history() {
        let mut bag = Bag::empty(0);
        let mut rng = rng();

        bag.add("a sword", &mut rng);
        bag.add("a shield", &mut rng);
        bag.add("a sword", &mut rng);

        assert_eq!(bag.contents(), ["a sword", "a shield", "a sword"]);
        assert_eq!(bag.history(), ["a sword", "a shield"]);
    }

    #[test]
    fn unbounded_bag_never_drops() {
        let mut bag = Bag::empty(0);
        let mut rng = rng();

        for i in 0..100 {
            assert!(bag.add(format!("item number {i}"), &mut rng).is_empty());
        }

        assert_eq!(bag.len(), 100);
    }

    #[test]
    fn oversized_item_still_goes_in() {
        let mut bag = Bag::empty(5);
        let mut rng = rng();

        bag.add("abc", &mut rng);
        let dropped = bag.add("a very heavy anvil", &mut rng);

        assert_eq!(dropped, ["abc"]);
        assert_eq!(bag.contents(), ["a very heavy anvil"]);
    }

    #[test]
    fn remove_specific_removes_one_occurrence() {
        let mut bag = Bag::empty(0);
        let mut rng = rng();

        bag.add("x", &mut rng);
        bag.add("x", &mut rng);

        assert!(bag.remove_specific("x"));
        assert_eq!(bag.contents(), ["x"]);
        assert!(!bag.remove_specific("y"));
    }

    #[test]
    fn pick_random_from_empty_bag() {
        assert_eq!(Bag::empty(0).pick_random(&mut rng()), Err(Error::EmptyBag));
    }

    #[test]
    fn transmogrify_empty_bag() {
        assert_eq!(Bag::empty(0).transmogrify(&mut rng()), Err(Error::EmptyBag));
    }

    #[test]
    fn conjure_with_empty_history_changes_nothing() {
        let mut bag = Bag::empty(10);

        assert_eq!(bag.conjure(&mut rng()), Err(Error::EmptyHistory));
        assert!(bag.is_empty());
    }
}
