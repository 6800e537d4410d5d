pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::TransactionError;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub sessions: sled::Tree,
    pub session_results: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub sessions_by_created_at: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl From<TransactionError<StoreError>> for StoreError {
    fn from(value: TransactionError<StoreError>) -> Self {
        match value {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => StoreError::Sled(e),
        }
    }
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let sessions = db.open_tree(trees::SESSIONS)?;
        let session_results = db.open_tree(trees::SESSION_RESULTS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let sessions_by_created_at = db.open_tree(trees::SESSIONS_BY_CREATED_AT)?;

        Ok(Self {
            db,
            sessions,
            session_results,
            config_versions,
            sessions_by_created_at,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Cheap read used by the database health probe.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.config_versions.get(migrate::VERSION_KEY.as_bytes())?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
