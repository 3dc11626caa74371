use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bag_of_holding::Inventory;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::{BagStore, Error, channel_key};

/// Keeps bags in a JSON file that maps channel names to inventories.
///
/// The whole file is read once when opened and rewritten after every save. Writes go to a
/// temporary file that is then renamed over the original, so a crash never leaves a truncated
/// file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    bags: Mutex<BTreeMap<String, Inventory>>,
}

impl FileStore {
    /// Opens the bag file at `path`. A missing file is treated as having no bags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file exists but can't be read, and [`Error::Parse`] if it
    /// isn't a valid bag file.
    pub async fn open(path: impl AsRef<Path>) -> Result<FileStore, Error> {
        let path = path.as_ref().to_path_buf();
        let bags = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| Error::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(?path, "bag file does not exist yet");

                BTreeMap::new()
            }
            Err(source) => return Err(Error::Read { path, source }),
        };

        Ok(FileStore {
            path,
            bags: Mutex::new(bags),
        })
    }

    /// Returns the path of the bag file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, bags: &BTreeMap<String, Inventory>) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(bags).map_err(Error::Serialize)?;
        let tmp_path = self.path.with_extension("tmp");
        let write_err = |source| Error::Write {
            path: self.path.clone(),
            source,
        };

        fs::write(&tmp_path, json).await.map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).await.map_err(write_err)
    }
}

#[async_trait]
impl BagStore for FileStore {
    async fn load(&self, channel: &str) -> Result<Inventory, Error> {
        let bags = self.bags.lock().await;

        Ok(bags.get(&channel_key(channel)).cloned().unwrap_or_default())
    }

    async fn save(&self, channel: &str, inventory: &Inventory) -> Result<(), Error> {
        let mut bags = self.bags.lock().await;
        // The change is only kept once it's on disk.
        let mut updated = bags.clone();
        updated.insert(channel_key(channel), inventory.clone());

        debug!(%channel, path = ?self.path, "writing bag file");

        self.flush(&updated).await?;
        *bags = updated;

        Ok(())
    }
}
