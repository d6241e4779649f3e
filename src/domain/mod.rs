pub mod board;
pub mod data;
pub mod layout;
pub mod sorting;
pub mod task;

pub use board::{default_columns, Board, Column, TaskFilter};
pub use data::KanbanData;
pub use layout::ColumnLayout;
pub use sorting::{sort_tasks, SortField, SortOrder};
pub use task::{HistoryEntry, Priority, Task, TaskDraft};
