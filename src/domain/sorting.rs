use crate::domain::task::{Priority, Task};
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Priority,
    Created,
    Updated,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: id, title, priority, created, updated",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Main sorting function for tasks
///
/// Sorts a slice of tasks in place based on the specified field and order.
/// Ordering is a display concern only; nothing downstream depends on it.
///
/// # Examples
/// ```
/// use kanban_core::domain::sorting::{sort_tasks, SortField, SortOrder};
/// use kanban_core::domain::task::Task;
///
/// let mut tasks = vec![
///     Task::new(3, "main".to_string(), "todo".to_string(), "C".to_string()).unwrap(),
///     Task::new(1, "main".to_string(), "todo".to_string(), "A".to_string()).unwrap(),
///     Task::new(2, "main".to_string(), "todo".to_string(), "B".to_string()).unwrap(),
/// ];
///
/// sort_tasks(&mut tasks, SortField::Id, SortOrder::Ascending);
/// assert_eq!(tasks[0].id, 1);
/// ```
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let cmp = match field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Priority => compare_priority(a.priority, b.priority),
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::Updated => a.updated_at.cmp(&b.updated_at),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare priorities by escalation order
///
/// Priority order: low → medium → high → critical
fn compare_priority(a: Priority, b: Priority) -> Ordering {
    fn priority_order(p: Priority) -> u8 {
        match p {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
            Priority::Critical => 3,
        }
    }
    priority_order(a).cmp(&priority_order(b))
}
