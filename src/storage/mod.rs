//! CSV import/export and export file layout.
//!
//! CSV is the only durable form of league data:
//! - Ranked group exports (`Team,Matches,Wins,Losses,RoundsWon,PD,PDT,Total`)
//! - Team list imports (`Team,Matches,Wins,Losses,RoundsWon`)
//! - Export files under `<data_dir>/exports`

mod csv_io;

pub use csv_io::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::error::LeagueError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    League(#[from] LeagueError),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
