//! Configuration store and its persistence hosts
//!
//! The store owns the in-memory [`RootConfig`]. `initialize` binds it to a
//! [`PersistenceHost`] and runs the legacy migration; every mutation after that
//! is followed by a synchronous `save`.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{error, info, warn};

use crate::config::migration::{migrate_legacy_favorites, MigrationOutcome};
use crate::config::model::{CharacterProfile, RootConfig};
use crate::error::StoreError;

/// Durable storage for the favorites configuration
pub trait PersistenceHost {
    /// Load persisted state. Nothing persisted yet is `Ok(RootConfig::default())`.
    fn load(&self) -> Result<RootConfig, StoreError>;

    fn save(&self, config: &RootConfig) -> Result<(), StoreError>;
}

pub struct ConfigStore {
    root: RootConfig,
    host: Option<Box<dyn PersistenceHost>>,
}

impl ConfigStore {
    /// Wrap already-loaded state. Not bound to storage until [`initialize`](Self::initialize).
    pub fn new(root: RootConfig) -> Self {
        Self { root, host: None }
    }

    /// Load from `host`, bind to it and migrate.
    /// Unreadable state is logged and replaced by an empty configuration.
    pub fn open(host: Box<dyn PersistenceHost>) -> Self {
        let root = host.load().unwrap_or_else(|e| {
            error!(error = %e, "Failed to load favorites, starting with empty configuration");
            RootConfig::default()
        });
        let mut store = Self::new(root);
        store.bind(host);
        store
    }

    /// Bind the store to durable storage and run the legacy migration.
    /// Saves once when the migration fired so the cleared legacy map sticks.
    pub fn initialize(&mut self, host: Box<dyn PersistenceHost>) -> Result<MigrationOutcome, StoreError> {
        if self.host.is_some() {
            return Err(StoreError::AlreadyInitialized);
        }
        Ok(self.bind(host))
    }

    fn bind(&mut self, host: Box<dyn PersistenceHost>) -> MigrationOutcome {
        self.host = Some(host);

        let outcome = migrate_legacy_favorites(&mut self.root);
        if outcome.fired() {
            if let Err(e) = self.save() {
                warn!(error = %e, "Failed to persist migrated favorites");
            }
        }
        info!(profiles = self.root.profiles_by_character_key.len(), "Configuration store initialized");
        outcome
    }

    pub fn is_initialized(&self) -> bool {
        self.host.is_some()
    }

    pub fn root(&self) -> &RootConfig {
        &self.root
    }

    pub fn profile(&self, character_key: &str) -> Option<&CharacterProfile> {
        self.root.profiles_by_character_key.get(character_key)
    }

    /// Existing profile for the key, or a new empty one. Any string is a valid key.
    pub fn get_or_create_profile(&mut self, character_key: &str) -> &mut CharacterProfile {
        self.root
            .profiles_by_character_key
            .entry(character_key.to_string())
            .or_default()
    }

    /// Character keys sorted for stable listing
    pub fn character_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.root.profiles_by_character_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Write the whole configuration. Until this succeeds, durable state may lag memory.
    pub fn save(&self) -> Result<(), StoreError> {
        let host = self.host.as_ref().ok_or(StoreError::NotInitialized)?;
        host.save(&self.root)
    }
}

/// Pretty JSON file, replaced atomically on save
pub struct JsonFileHost {
    path: PathBuf,
}

impl JsonFileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/zone-level-guide/favorites.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".");
        name.push(crate::constants::config::BACKUP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io { path: path.to_path_buf(), source }
    }
}

impl PersistenceHost for JsonFileHost {
    fn load(&self) -> Result<RootConfig, StoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Favorites file not found, using empty configuration");
            return Ok(RootConfig::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(&self.path, e))?;
        match serde_json::from_str::<RootConfig>(&contents) {
            Ok(root) => {
                info!(path = %self.path.display(), profiles = root.profiles_by_character_key.len(), "Loaded favorites");
                Ok(root)
            }
            Err(source) => {
                // Keep the unreadable file around; the next save replaces it
                let backup = self.backup_path();
                match fs::copy(&self.path, &backup) {
                    Ok(_) => warn!(backup = %backup.display(), "Copied unreadable favorites file"),
                    Err(e) => warn!(backup = %backup.display(), error = %e, "Failed to back up unreadable favorites file"),
                }
                Err(StoreError::Parse { path: self.path.clone(), source })
            }
        }
    }

    fn save(&self, config: &RootConfig) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
            }
        }
        let contents = serde_json::to_string_pretty(config)?;

        let temp = self.temp_path();
        let mut file = File::create(&temp).map_err(|e| self.io_error(&temp, e))?;
        file.write_all(contents.as_bytes()).map_err(|e| self.io_error(&temp, e))?;
        file.sync_all().map_err(|e| self.io_error(&temp, e))?;
        drop(file);
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(&self.path, e))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    json: Option<String>,
    saves: usize,
    fail_saves: bool,
}

/// In-memory host holding the serialized JSON. Clones share the same storage,
/// so a caller can keep a handle after boxing one into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose storage already contains `config`
    pub fn with_config(config: &RootConfig) -> Result<Self, StoreError> {
        let host = Self::new();
        host.state.borrow_mut().json = Some(serde_json::to_string(config)?);
        Ok(host)
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.state.borrow().saves
    }

    /// Make subsequent saves fail with an io error
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    /// Last saved configuration, decoded
    pub fn saved(&self) -> Option<RootConfig> {
        let state = self.state.borrow();
        state.json.as_deref().and_then(|json| serde_json::from_str(json).ok())
    }
}

impl PersistenceHost for MemoryHost {
    fn load(&self) -> Result<RootConfig, StoreError> {
        let state = self.state.borrow();
        match state.json.as_deref() {
            Some(json) => serde_json::from_str(json).map_err(|source| StoreError::Parse {
                path: PathBuf::from("<memory>"),
                source,
            }),
            None => Ok(RootConfig::default()),
        }
    }

    fn save(&self, config: &RootConfig) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(StoreError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("save disabled"),
            });
        }
        state.json = Some(serde_json::to_string(config)?);
        state.saves += 1;
        Ok(())
    }
}
