use std::{
    fmt,
    path::{Path, PathBuf},
};

use const_format::concatcp;

mod clock;
mod data_manager;
pub mod database;
pub mod memory;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, "locations.db");

#[derive(Debug)]
pub enum DataManagerError {
    Database(String),
    Memory(String),
}

impl fmt::Display for DataManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataManagerError::Database(msg) => write!(f, "database error: {msg}"),
            DataManagerError::Memory(msg) => write!(f, "memory store error: {msg}"),
        }
    }
}

impl std::error::Error for DataManagerError {}

/// Relative paths are taken from the project root, or the working directory when
/// no project root can be found (installed binaries).
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    project_root::get_project_root()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}
