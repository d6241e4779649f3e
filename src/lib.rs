//! # Kanban Core
//!
//! Core domain model and storage for a personal kanban task board.
//!
//! This crate provides the fundamental types and operations for managing
//! boards, columns, and tasks (WIP limits, task history, agent metadata)
//! plus a storage layer that persists the whole board set as a single
//! JSON document with atomic-replace semantics, without any dependency
//! on specific UI implementations.

pub mod domain;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use domain::{
    board::{default_columns, Board, Column, TaskFilter},
    data::KanbanData,
    layout::ColumnLayout,
    task::{HistoryEntry, Priority, Task, TaskDraft},
};
pub use error::{KanbanError, Result};
pub use storage::{file_storage::FileStorage, Loaded, Recovery, Storage};
