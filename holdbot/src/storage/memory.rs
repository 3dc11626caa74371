use std::collections::HashMap;

use async_trait::async_trait;
use bag_of_holding::Inventory;
use tokio::sync::RwLock;

use super::{BagStore, Error, channel_key};

/// Keeps bags in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bags: RwLock<HashMap<String, Inventory>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

#[async_trait]
impl BagStore for MemoryStore {
    async fn load(&self, channel: &str) -> Result<Inventory, Error> {
        let bags = self.bags.read().await;

        Ok(bags.get(&channel_key(channel)).cloned().unwrap_or_default())
    }

    async fn save(&self, channel: &str, inventory: &Inventory) -> Result<(), Error> {
        let mut bags = self.bags.write().await;
        bags.insert(channel_key(channel), inventory.clone());

        Ok(())
    }
}
