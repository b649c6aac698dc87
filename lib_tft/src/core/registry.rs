//! # Guild Message Registry
//!
//! Persistent map of guild id → the location of that guild's live board
//! message. The in-memory map is the source of truth; the JSON file is a
//! snapshot rewritten after every mutation.
//!
//! On disk the document is an object keyed by guild id strings:
//!
//! ```json
//! { "794733579770920990": [1024553143342268446, 1186680530191646750] }
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Where a posted board message lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageLocation {
    /// Channel the message was posted in.
    pub channel_id: u64,
    /// Message id inside that channel.
    pub message_id: u64,
}

impl MessageLocation {
    /// Creates a location.
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        Self { channel_id, message_id }
    }
}

/// The shapes a registry value may take in the file.
///
/// The array is what gets written; the object form is accepted so a file
/// edited by hand with named fields still loads.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredLocation {
    Pair(u64, u64),
    Record { channel_id: u64, message_id: u64 },
}

impl From<StoredLocation> for MessageLocation {
    fn from(stored: StoredLocation) -> Self {
        match stored {
            StoredLocation::Pair(channel_id, message_id) => Self::new(channel_id, message_id),
            StoredLocation::Record { channel_id, message_id } => Self::new(channel_id, message_id),
        }
    }
}

/// Errors raised while loading or persisting the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The file exists but could not be read or written.
    #[error("registry I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not a registry document.
    #[error("registry file {path} is malformed: {source}")]
    Malformed {
        /// File involved.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A key of the document is not a numeric id.
    #[error("registry file {path} has a non-numeric id {key:?}")]
    InvalidId {
        /// File involved.
        path: PathBuf,
        /// Offending key.
        key: String,
    },

    /// The in-memory map could not be serialized.
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// # Guild Registry
///
/// Every `put`/`remove` takes the lock, mutates the map and rewrites the file
/// before releasing it, so two concurrent mutations can never interleave their
/// writes.
pub struct GuildRegistry {
    path: PathBuf,
    entries: Mutex<BTreeMap<u64, MessageLocation>>,
}

impl GuildRegistry {
    /// Creates an empty registry that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Loads the registry from `path`.
    ///
    /// A missing file yields an empty registry. Anything that exists but does
    /// not parse is an error: guessing at an unknown shape would silently drop
    /// every guild on the next write.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let path = path.into();

        let Some(raw) = read_snapshot(&path).await? else {
            log::info!("Registry {} not found, starting empty", path.display());
            return Ok(Self::empty(path));
        };

        let entries = Self::decode(&path, &raw)?;
        log::info!("Loaded {} guild(s) from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn decode(path: &Path, raw: &[u8]) -> Result<BTreeMap<u64, MessageLocation>, RegistryError> {
        // An empty file is what a crash between create and first write leaves.
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        let document: BTreeMap<String, Option<StoredLocation>> =
            serde_json::from_slice(raw).map_err(|source| RegistryError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        let mut entries = BTreeMap::new();
        for (key, value) in document {
            let guild_id = key.trim().parse::<u64>().map_err(|_| RegistryError::InvalidId {
                path: path.to_path_buf(),
                key: key.clone(),
            })?;
            if let Some(stored) = value {
                entries.insert(guild_id, MessageLocation::from(stored));
            }
        }
        Ok(entries)
    }

    fn encode(entries: &BTreeMap<u64, MessageLocation>) -> Result<Vec<u8>, RegistryError> {
        let document: BTreeMap<String, [u64; 2]> = entries
            .iter()
            .map(|(guild_id, loc)| (guild_id.to_string(), [loc.channel_id, loc.message_id]))
            .collect();
        Ok(serde_json::to_vec_pretty(&document)?)
    }

    /// Returns the current location for `guild_id`.
    pub async fn get(&self, guild_id: u64) -> Option<MessageLocation> {
        self.entries.lock().await.get(&guild_id).copied()
    }

    /// Stores or replaces the location for `guild_id`, then persists.
    pub async fn put(&self, guild_id: u64, location: MessageLocation) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().await;
        entries.insert(guild_id, location);
        self.persist(&entries).await
    }

    /// Deletes the entry for `guild_id`, then persists.
    ///
    /// Returns the removed location. Removing an absent guild writes nothing.
    pub async fn remove(&self, guild_id: u64) -> Result<Option<MessageLocation>, RegistryError> {
        let mut entries = self.entries.lock().await;
        let removed = entries.remove(&guild_id);
        if removed.is_some() {
            self.persist(&entries).await?;
        }
        Ok(removed)
    }

    /// Deletes the entry for `guild_id` only while it still equals `expected`.
    ///
    /// Returns whether an entry was removed.
    pub async fn remove_if(&self, guild_id: u64, expected: MessageLocation) -> Result<bool, RegistryError> {
        let mut entries = self.entries.lock().await;
        if entries.get(&guild_id) != Some(&expected) {
            return Ok(false);
        }
        entries.remove(&guild_id);
        self.persist(&entries).await?;
        Ok(true)
    }

    /// A snapshot of every registered guild id.
    pub async fn keys(&self) -> Vec<u64> {
        self.entries.lock().await.keys().copied().collect()
    }

    /// Number of registered guilds.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no guild is registered.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn persist(&self, entries: &BTreeMap<u64, MessageLocation>) -> Result<(), RegistryError> {
        write_snapshot(&self.path, &Self::encode(entries)?).await?;
        log::debug!("Persisted {} guild(s) to {}", entries.len(), self.path.display());
        Ok(())
    }
}

/// Writes `bytes` next to `path` and renames the file into place.
pub(super) async fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), RegistryError> {
    let io_err = |source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}

/// Reads a snapshot. `Ok(None)` when the file does not exist.
pub(super) async fn read_snapshot(path: &Path) -> Result<Option<Vec<u8>>, RegistryError> {
    match tokio::fs::read(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RegistryError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
