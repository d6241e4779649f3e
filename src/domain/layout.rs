use crate::domain::board::{Board, Column};

/// Named column layouts a board can be migrated to
///
/// Migration is always an explicit caller decision; nothing applies a
/// layout implicitly at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// Three-stage layout: To Do, In Progress (WIP 3), Done
    Classic,
    /// Five-stage layout: Backlog, To Do, In Progress (WIP 3), Testing, Done
    Extended,
}

impl ColumnLayout {
    /// The canonical column set of this layout
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Self::Classic => vec![
                Column::new("todo".to_string(), "To Do".to_string()).with_order(0),
                Column::new("inprogress".to_string(), "In Progress".to_string())
                    .with_limit(3)
                    .with_order(1),
                Column::new("done".to_string(), "Done".to_string()).with_order(2),
            ],
            Self::Extended => vec![
                Column::new("backlog".to_string(), "Backlog".to_string()).with_order(0),
                Column::new("todo".to_string(), "To Do".to_string()).with_order(1),
                Column::new("inprogress".to_string(), "In Progress".to_string())
                    .with_limit(3)
                    .with_order(2),
                Column::new("testing".to_string(), "Testing".to_string()).with_order(3),
                Column::new("done".to_string(), "Done".to_string()).with_order(4),
            ],
        }
    }

    /// Migrates a board's columns to this layout
    ///
    /// Known columns are renamed and reordered to their canonical values;
    /// missing columns are appended with their canonical WIP limits. An
    /// existing column's limit is never touched, and columns outside the
    /// layout (and all tasks) are left alone. Returns whether anything
    /// changed.
    pub fn apply(&self, board: &mut Board) -> bool {
        let canonical = self.columns();
        let mut changed = false;

        for column in &mut board.columns {
            if let Some(target) = canonical.iter().find(|c| c.id == column.id) {
                if column.name != target.name {
                    column.name = target.name.clone();
                    changed = true;
                }
                if column.order != target.order {
                    column.order = target.order;
                    changed = true;
                }
            }
        }

        for target in canonical {
            if board.find_column(&target.id).is_none() {
                board.columns.push(target);
                changed = true;
            }
        }

        board.columns.sort_by_key(|c| c.order);

        if changed {
            board.updated_at = chrono::Utc::now();
        }
        changed
    }
}
