use crate::{domain::KanbanData, error::Result};
use std::path::{Path, PathBuf};

pub mod file_storage;

/// Result of a load, reporting where the document came from
#[derive(Debug)]
pub struct Loaded {
    pub data: KanbanData,
    /// Present when a corrupt on-disk document was quarantined and replaced
    /// with a fresh default; callers should warn the user.
    pub recovery: Option<Recovery>,
}

/// Details of a corruption recovery performed during a load
#[derive(Debug)]
pub struct Recovery {
    /// Where the original bytes were preserved
    pub quarantine_path: PathBuf,
    /// The parse error that triggered the recovery
    pub error: String,
}

/// Storage backend for persisting the whole kanban document
///
/// One document per backend; entities are never persisted individually.
pub trait Storage: Send + Sync {
    /// Loads the document, synthesizing and persisting a default one when
    /// the backing file is missing or corrupt
    fn load(&self) -> Result<Loaded>;

    /// Persists the document atomically; on failure the previous state
    /// stays intact
    fn save(&self, data: &KanbanData) -> Result<()>;

    /// Copies the current on-disk document byte-for-byte; returns the path
    /// written
    fn backup(&self, destination: Option<&Path>) -> Result<PathBuf>;
}
