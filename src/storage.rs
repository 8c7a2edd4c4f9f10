//! Key-value persistence
//!
//! Each logical collection lives under one key as a JSON string. Stores are
//! not transactional across keys: every `set` stands on its own.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StorageConfig;
use crate::crypto::{self, Sealer};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("data directory not found")]
    NoDataDir,
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Backend for the app-state controller.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode `key`, falling back to `T::default()` when the key is
/// missing or unreadable. Failures are logged, never returned.
pub fn load_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to decode '{}', using defaults: {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::error!("Failed to read '{}', using defaults: {}", key, e);
            T::default()
        }
    }
}

/// Encode and write `value` under `key`.
pub fn save<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)?;
    tracing::debug!("Saved '{}' ({} bytes)", key, json.len());
    Ok(())
}

/// [`save`] for callers that must not fail: the error is logged and the
/// caller carries on with its in-memory state.
pub fn save_logged<S, T>(store: &mut S, key: &str, value: &T) -> bool
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    match save(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to persist '{}': {}", key, e);
            false
        }
    }
}

/// Ephemeral store for tests and previews.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

const SALT_FILE: &str = ".salt";
const CHECK_FILE: &str = ".check";
const CHECK_PAYLOAD: &[u8] = b"lunara";

/// One file per key under a data directory, optionally sealed with a
/// passphrase-derived key.
pub struct FileStore {
    root: PathBuf,
    sealer: Option<Sealer>,
}

impl FileStore {
    /// Plain JSON files.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        tracing::info!("File store opened at: {:?}", config.data_dir);
        Ok(Self {
            root: config.data_dir.clone(),
            sealer: None,
        })
    }

    /// Sealed files. The first call on a directory creates its salt and a
    /// check record; later calls fail with a crypto error on a wrong
    /// passphrase.
    pub fn open_encrypted(config: &StorageConfig, passphrase: &str) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        let root = config.data_dir.clone();

        let salt_path = root.join(SALT_FILE);
        let salt = if salt_path.exists() {
            fs::read(&salt_path)?
        } else {
            let salt = crypto::generate_salt().to_vec();
            write_atomic(&salt_path, &salt)?;
            salt
        };

        let sealer = Sealer::new(passphrase, &salt)?;
        let check_path = root.join(CHECK_FILE);
        if check_path.exists() {
            sealer.open(&fs::read(&check_path)?)?;
        } else {
            write_atomic(&check_path, &sealer.seal(CHECK_PAYLOAD)?)?;
        }

        tracing::info!("Encrypted file store opened at: {:?}", root);
        Ok(Self {
            root,
            sealer: Some(sealer),
        })
    }

    /// Whether an encrypted store was ever created in this directory.
    pub fn is_initialized(config: &StorageConfig) -> bool {
        config.data_dir.join(CHECK_FILE).exists()
    }

    /// Delete every file of the store, including salt and check record.
    pub fn wipe(config: &StorageConfig) -> Result<(), StorageError> {
        if config.data_dir.exists() {
            fs::remove_dir_all(&config.data_dir)?;
            tracing::info!("Wiped store at: {:?}", config.data_dir);
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let extension = if self.sealer.is_some() { "sealed" } else { "json" };
        Ok(self.root.join(format!("{key}.{extension}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let bytes = match &self.sealer {
            Some(sealer) => sealer.open(&bytes)?,
            None => bytes,
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Some(text))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let bytes = match &self.sealer {
            Some(sealer) => sealer.seal(value.as_bytes())?,
            None => value.as_bytes().to_vec(),
        };
        write_atomic(&path, &bytes)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Write to a temp file first, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
