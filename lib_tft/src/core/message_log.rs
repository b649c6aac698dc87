//! # Posted Message Log
//!
//! Remembers every message a multi-message post left behind, grouped by
//! channel, so the next post can take them all down again.
//!
//! On disk the document is an object keyed by channel id strings:
//!
//! ```json
//! { "1024553143342268446": [1186680530191646750, 1186680530191646751] }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::registry::{read_snapshot, write_snapshot, RegistryError};

/// # Message Log
///
/// Same persistence rules as the guild registry: the in-memory map is the
/// source of truth and every mutation rewrites the file under the lock.
pub struct MessageLog {
    path: PathBuf,
    channels: Mutex<BTreeMap<u64, Vec<u64>>>,
}

impl MessageLog {
    /// Creates an empty log that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            channels: Mutex::new(BTreeMap::new()),
        }
    }

    /// Loads the log from `path`. A missing file yields an empty log.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();

        let Some(raw) = read_snapshot(&path).await? else {
            log::info!("Message log {} not found, starting empty", path.display());
            return Ok(Self::empty(path));
        };

        let channels = Self::decode(&path, &raw)?;
        log::info!("Loaded messages of {} channel(s) from {}", channels.len(), path.display());

        Ok(Self {
            path,
            channels: Mutex::new(channels),
        })
    }

    fn decode(path: &Path, raw: &[u8]) -> Result<BTreeMap<u64, Vec<u64>>, RegistryError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        let document: BTreeMap<String, Vec<u64>> =
            serde_json::from_slice(raw).map_err(|source| RegistryError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        let mut channels = BTreeMap::new();
        for (key, message_ids) in document {
            let channel_id = key.trim().parse::<u64>().map_err(|_| RegistryError::InvalidId {
                path: path.to_path_buf(),
                key: key.clone(),
            })?;
            if !message_ids.is_empty() {
                channels.insert(channel_id, message_ids);
            }
        }
        Ok(channels)
    }

    /// Appends `message_id` to the channel's list, then persists.
    pub async fn record(&self, channel_id: u64, message_id: u64) -> Result<(), RegistryError> {
        let mut channels = self.channels.lock().await;
        channels.entry(channel_id).or_default().push(message_id);
        self.persist(&channels).await
    }

    /// Every recorded message, grouped by channel.
    pub async fn snapshot(&self) -> BTreeMap<u64, Vec<u64>> {
        self.channels.lock().await.clone()
    }

    /// Forgets every recorded message, then persists.
    pub async fn clear(&self) -> Result<(), RegistryError> {
        let mut channels = self.channels.lock().await;
        channels.clear();
        self.persist(&channels).await
    }

    /// Total number of recorded messages.
    pub async fn len(&self) -> usize {
        self.channels.lock().await.values().map(Vec::len).sum()
    }

    /// Whether no message is recorded.
    pub async fn is_empty(&self) -> bool {
        self.channels.lock().await.is_empty()
    }

    async fn persist(&self, channels: &BTreeMap<u64, Vec<u64>>) -> Result<(), RegistryError> {
        let document: BTreeMap<String, &Vec<u64>> = channels.iter().map(|(id, ids)| (id.to_string(), ids)).collect();
        write_snapshot(&self.path, &serde_json::to_vec_pretty(&document)?).await?;
        log::debug!("Persisted messages of {} channel(s) to {}", channels.len(), self.path.display());
        Ok(())
    }
}
