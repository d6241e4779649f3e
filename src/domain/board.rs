use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::task::{Priority, Task, TaskDraft};
use crate::error::{KanbanError, Result};

/// A kanban column (e.g. To Do, In Progress, Done)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Stable identifier, unique within a board
    pub id: String,
    /// Display name
    pub name: String,
    /// WIP limit; `None` means unlimited
    pub limit: Option<u32>,
    /// Display sort order; ties keep insertion order
    #[serde(default)]
    pub order: i32,
}

impl Column {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            limit: None,
            order: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// The seed columns a fresh board starts with
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("todo".to_string(), "To Do".to_string()).with_order(0),
        Column::new("inprogress".to_string(), "In Progress".to_string())
            .with_limit(3)
            .with_order(1),
        Column::new("done".to_string(), "Done".to_string()).with_order(2),
    ]
}

/// Optional predicate for narrowing a board's task list
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub column_id: Option<String>,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
}

impl TaskFilter {
    pub fn column(mut self, column_id: String) -> Self {
        self.column_id = Some(column_id);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn tag(mut self, tag: String) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(column_id) = &self.column_id {
            if task.column_id != *column_id {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.has_tag(tag) {
                return false;
            }
        }
        true
    }
}

/// A kanban board containing columns and tasks
///
/// Tasks are kept in creation order, not column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Lowest id the next task may take; raised by deletes so ids are not
    /// reused while the board stays in memory. Not persisted.
    #[serde(skip)]
    id_floor: u32,
}

impl Board {
    pub fn new(id: String, name: String, columns: Vec<Column>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            columns,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            id_floor: 0,
        }
    }

    /// Generates the next available task id
    ///
    /// One greater than the highest existing id (1 for an empty board), and
    /// never an id retired by a delete in this session.
    pub fn next_task_id(&self) -> u32 {
        let max_id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        (max_id + 1).max(self.id_floor)
    }

    /// Returns the tasks currently in a column, in creation order
    pub fn tasks_in_column(&self, column_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.column_id == column_id)
            .collect()
    }

    /// Looks up a column by id
    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Looks up a task by id
    pub fn find_task(&self, task_id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Looks up a task by id, mutably
    pub fn find_task_mut(&mut self, task_id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Checks whether a task may be placed into a column
    ///
    /// Advisory: callers consult this before appending or moving a task; the
    /// entity does not block [`Task::move_to`] itself.
    pub fn can_add_to_column(&self, column_id: &str) -> Result<()> {
        let column = self
            .find_column(column_id)
            .ok_or_else(|| KanbanError::ColumnNotFound(column_id.to_string()))?;

        if let Some(limit) = column.limit {
            let current = self.tasks_in_column(column_id).len() as u32;
            if current >= limit {
                return Err(KanbanError::WipLimitReached {
                    column: column.name.clone(),
                    limit,
                });
            }
        }

        Ok(())
    }

    /// Returns the columns in display order; ties keep insertion order
    pub fn sorted_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order);
        columns
    }

    /// Returns the tasks matching a filter, in creation order
    pub fn filter_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Creates a task from a draft and appends it to the board
    ///
    /// Checks the destination column and its WIP limit first; returns the
    /// assigned task id.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<u32> {
        self.can_add_to_column(&draft.column_id)?;

        let id = self.next_task_id();
        let mut task = Task::new(id, self.id.clone(), draft.column_id, draft.title)?;
        task.description = draft.description;
        task.priority = draft.priority;
        for tag in draft.tags {
            task.add_tag(tag);
        }

        self.tasks.push(task);
        self.touch();
        Ok(id)
    }

    /// Moves a task to a different column after checking its WIP limit
    ///
    /// Moving a task onto the column it is already in is a no-op and returns
    /// `Ok(false)`; a real move returns `Ok(true)`.
    pub fn move_task(
        &mut self,
        task_id: u32,
        column_id: &str,
        reason: Option<String>,
    ) -> Result<bool> {
        let current_column = self
            .find_task(task_id)
            .map(|t| t.column_id.clone())
            .ok_or(KanbanError::TaskNotFound(task_id))?;

        if current_column == column_id {
            return Ok(false);
        }

        self.can_add_to_column(column_id)?;

        if let Some(task) = self.find_task_mut(task_id) {
            task.move_to(column_id.to_string(), reason);
        }
        self.touch();
        Ok(true)
    }

    /// Removes a task and returns it
    ///
    /// The removed id is retired for the rest of this session.
    pub fn remove_task(&mut self, task_id: u32) -> Result<Task> {
        let position = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(KanbanError::TaskNotFound(task_id))?;

        let task = self.tasks.remove(position);
        self.id_floor = self.id_floor.max(task.id + 1);
        self.touch();
        Ok(task)
    }

    /// Adds a column; column ids must be unique within the board
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.find_column(&column.id).is_some() {
            return Err(KanbanError::DuplicateColumn(column.id));
        }
        self.columns.push(column);
        self.touch();
        Ok(())
    }

    /// Removes a column and returns it
    ///
    /// Refused while tasks still reference the column, so a task's
    /// `column_id` cannot be left dangling through this API.
    pub fn remove_column(&mut self, column_id: &str) -> Result<Column> {
        let position = self
            .columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| KanbanError::ColumnNotFound(column_id.to_string()))?;

        let in_use = self.tasks_in_column(column_id).len();
        if in_use > 0 {
            return Err(KanbanError::ColumnInUse {
                column: column_id.to_string(),
                tasks: in_use,
            });
        }

        let column = self.columns.remove(position);
        self.touch();
        Ok(column)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
