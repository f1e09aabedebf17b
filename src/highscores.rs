//! Best score persistence
//!
//! The core owns a single best-score scalar; the storage collaborator behind
//! [`BestScoreStore`] only reads it once at construction and receives
//! fire-and-forget writes when it is raised.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage collaborator failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored best score is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported best score format version {0}")]
    UnsupportedVersion(u32),
    #[error("storage unavailable")]
    Unavailable,
}

/// Where the best score lives between runs
pub trait BestScoreStore {
    /// Read the persisted best score. Called once when a game state is built.
    fn load_best_score(&self) -> Result<u64, StorageError>;

    /// Persist a new best score.
    fn save_best_score(&mut self, value: u64) -> Result<(), StorageError>;
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn load_best_score(&self) -> Result<u64, StorageError> {
        (**self).load_best_score()
    }

    fn save_best_score(&mut self, value: u64) -> Result<(), StorageError> {
        (**self).save_best_score(value)
    }
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for &mut S {
    fn load_best_score(&self) -> Result<u64, StorageError> {
        (**self).load_best_score()
    }

    fn save_best_score(&mut self, value: u64) -> Result<(), StorageError> {
        (**self).save_best_score(value)
    }
}

/// In-memory store that records every write
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
    /// Values passed to `save_best_score`, oldest first
    pub writes: Vec<u64>,
    /// Make every load/save fail (simulates a broken backend)
    pub fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best score
    pub fn with_best(best: u64) -> Self {
        Self {
            best: Some(best),
            ..Self::default()
        }
    }

    /// Store whose loads and saves always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Most recently stored value
    pub fn stored(&self) -> Option<u64> {
        self.best
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best_score(&self) -> Result<u64, StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable);
        }
        Ok(self.best.unwrap_or(0))
    }

    fn save_best_score(&mut self, value: u64) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable);
        }
        self.best = Some(value);
        self.writes.push(value);
        Ok(())
    }
}

/// On-disk document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BestScoreFile {
    version: u32,
    best_score: u64,
}

impl BestScoreFile {
    const VERSION: u32 = 1;
}

/// Best score kept in a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for JsonFileStore {
    fn load_best_score(&self) -> Result<u64, StorageError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No best score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };
        let file: BestScoreFile = serde_json::from_str(&json)?;
        if file.version != BestScoreFile::VERSION {
            return Err(StorageError::UnsupportedVersion(file.version));
        }
        log::info!("Loaded best score {}", file.best_score);
        Ok(file.best_score)
    }

    fn save_best_score(&mut self, value: u64) -> Result<(), StorageError> {
        let file = BestScoreFile {
            version: BestScoreFile::VERSION,
            best_score: value,
        };
        let json = serde_json::to_string_pretty(&file)?;

        // tmp → save
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score saved ({})", value);
        Ok(())
    }
}
