use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Task #{0} not found")]
    TaskNotFound(u32),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("WIP limit ({limit}) reached for '{column}'")]
    WipLimitReached { column: String, limit: u32 },

    #[error("Invalid task title: {0}")]
    InvalidTitle(String),

    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("Column '{column}' still has {tasks} task(s)")]
    ColumnInUse { column: String, tasks: usize },

    #[error("Cannot delete the only board")]
    LastBoard,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
