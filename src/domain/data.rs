use serde::{Deserialize, Serialize};

use crate::domain::board::{default_columns, Board};
use crate::domain::task::Task;
use crate::error::{KanbanError, Result};

/// Data format version written to new documents
pub const DATA_VERSION: &str = "1.0";

/// Id of the board a fresh installation starts with
pub const DEFAULT_BOARD_ID: &str = "main";

/// Name of the board a fresh installation starts with
pub const DEFAULT_BOARD_NAME: &str = "Main Board";

/// Root container for the whole kanban document
///
/// Owns every board; the `default_board` id selects which board operations
/// target when no board is named explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanData {
    pub version: String,
    pub boards: Vec<Board>,
    pub default_board: String,
}

impl Default for KanbanData {
    fn default() -> Self {
        Self {
            version: DATA_VERSION.to_string(),
            boards: Vec::new(),
            default_board: DEFAULT_BOARD_ID.to_string(),
        }
    }
}

impl KanbanData {
    /// Creates the seed document: one board with the default columns and no tasks
    pub fn bootstrap(board_name: String) -> Self {
        let board = Board::new(
            DEFAULT_BOARD_ID.to_string(),
            board_name,
            default_columns(),
        );
        Self {
            version: DATA_VERSION.to_string(),
            boards: vec![board],
            default_board: DEFAULT_BOARD_ID.to_string(),
        }
    }

    /// Resolves a board by id, falling back to the default board
    pub fn find_board(&self, board_id: Option<&str>) -> Option<&Board> {
        let target = board_id.unwrap_or(&self.default_board);
        self.boards.iter().find(|b| b.id == target)
    }

    /// Resolves a board by id, mutably
    pub fn find_board_mut(&mut self, board_id: Option<&str>) -> Option<&mut Board> {
        let target = board_id.unwrap_or(&self.default_board).to_string();
        self.boards.iter_mut().find(|b| b.id == target)
    }

    /// Resolves a task by id on the given (or default) board
    pub fn find_task(&self, task_id: u32, board_id: Option<&str>) -> Option<&Task> {
        self.find_board(board_id)?.find_task(task_id)
    }

    /// Resolves a task by id on the given (or default) board, mutably
    pub fn find_task_mut(&mut self, task_id: u32, board_id: Option<&str>) -> Option<&mut Task> {
        self.find_board_mut(board_id)?.find_task_mut(task_id)
    }

    /// Total number of tasks across all boards
    pub fn total_tasks(&self) -> usize {
        self.boards.iter().map(|b| b.tasks.len()).sum()
    }

    /// Creates a board with the default columns and returns its id
    ///
    /// The id is a slug derived from the name, suffixed with a counter on
    /// collision. The first board ever created becomes the default
    /// regardless of `set_default`.
    pub fn create_board(&mut self, name: String, set_default: bool) -> String {
        let base = slug(&name);
        let mut board_id = base.clone();
        let mut counter = 1;
        while self.boards.iter().any(|b| b.id == board_id) {
            board_id = format!("{}-{}", base, counter);
            counter += 1;
        }

        self.boards
            .push(Board::new(board_id.clone(), name, default_columns()));

        if set_default || self.boards.len() == 1 {
            self.default_board = board_id.clone();
        }
        board_id
    }

    /// Deletes a board and all its tasks
    ///
    /// The last remaining board cannot be deleted. Deleting the default
    /// board reassigns `default_board` to the first remaining board.
    pub fn delete_board(&mut self, board_id: &str) -> Result<Board> {
        let position = self
            .boards
            .iter()
            .position(|b| b.id == board_id)
            .ok_or_else(|| KanbanError::BoardNotFound(board_id.to_string()))?;

        if self.boards.len() <= 1 {
            return Err(KanbanError::LastBoard);
        }

        let board = self.boards.remove(position);
        if self.default_board == board_id {
            if let Some(first) = self.boards.first() {
                self.default_board = first.id.clone();
            }
        }
        Ok(board)
    }

    /// Sets the default board
    pub fn set_default_board(&mut self, board_id: &str) -> Result<()> {
        if self.find_board(Some(board_id)).is_none() {
            return Err(KanbanError::BoardNotFound(board_id.to_string()));
        }
        self.default_board = board_id.to_string();
        Ok(())
    }
}

/// Derives a board id from a display name
///
/// Lowercase, whitespace mapped to dashes, everything else restricted to
/// ASCII alphanumerics and dashes, truncated to 20 characters.
fn slug(name: &str) -> String {
    let mut out = String::new();
    for ch in name.to_lowercase().chars() {
        if out.len() >= 20 {
            break;
        }
        if ch.is_ascii_alphanumeric() || ch == '-' {
            out.push(ch);
        } else if ch.is_whitespace() {
            out.push('-');
        }
    }
    if out.is_empty() {
        "board".to_string()
    } else {
        out
    }
}
