//! Flat-file persistence
//!
//! Users and readings live in JSON array files under the configured data
//! directory. Each file is rewritten whole on every change.

mod json_file;
mod readings;
mod users;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use json_file::JsonFile;
pub use readings::ReadingStore;
pub use users::UserStore;

use crate::config::StorageConfig;

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// All persistent collections
pub struct Store {
    pub users: UserStore,
    pub readings: ReadingStore,
}

impl Store {
    /// Open the store rooted at the configured data directory
    pub fn open(config: &StorageConfig) -> Self {
        Self::in_dir(&config.data_dir, config.max_readings)
    }

    pub fn in_dir(data_dir: impl AsRef<Path>, max_readings: usize) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            users: UserStore::new(JsonFile::new(data_dir.join("users.json"))),
            readings: ReadingStore::new(
                JsonFile::new(data_dir.join("readings.json")),
                max_readings,
            ),
        }
    }
}
