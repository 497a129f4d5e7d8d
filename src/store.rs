// JSON file persistence for saved plans.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::schedule::PlanState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid plan data for {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A saved plan on disk
#[derive(Debug, Clone)]
pub struct PlanStore {
    path: PathBuf,
}

impl PlanStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PlanStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved plan, or the cleared state when nothing was saved yet
    pub fn load(&self) -> Result<PlanState, StoreError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No saved plan at {}, starting empty", self.path.display());
                return Ok(PlanState::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        info!("Loading plan from {}", self.path.display());
        serde_json::from_str(&data).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, state: &PlanState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!("Saved plan to {}", self.path.display());
        Ok(())
    }

    /// Removes the saved plan; a missing file is not an error
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
