//! To-do tasks with due dates and priorities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::{format_date, parse_date};
use crate::error::{Result, ValidationError};
use crate::records::{checked_text, generate_id, position, Record};
use crate::storage::{Storage, StorageExt};

/// Record key for the task list.
pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// High sorts first.
    fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("'{s}' is not Low, Medium or High"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl Record for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn due(&self) -> Option<NaiveDate> {
        parse_date(&self.due_date)
    }
}

/// User-editable task fields.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    /// Pending tasks due today.
    Today,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    #[default]
    DueDate,
    Priority,
}

pub struct TaskList<'a> {
    store: &'a dyn Storage,
    tasks: Vec<Task>,
}

impl<'a> TaskList<'a> {
    pub fn load(store: &'a dyn Storage) -> Self {
        let tasks = store.load_or_default(TASKS_KEY);
        Self { store, tasks }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Result<&Task> {
        let i = position(&self.tasks, id)?;
        Ok(&self.tasks[i])
    }

    pub fn add(&mut self, draft: TaskDraft, today: NaiveDate) -> Result<&Task> {
        let (title, due_date) = validate(&draft, today)?;
        self.tasks.push(Task {
            id: generate_id(),
            title,
            description: draft.description.trim().to_string(),
            due_date,
            priority: draft.priority,
            status: TaskStatus::Pending,
        });
        self.persist()?;
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn update(&mut self, id: &str, draft: TaskDraft, today: NaiveDate) -> Result<&Task> {
        let i = position(&self.tasks, id)?;
        let (title, due_date) = validate(&draft, today)?;
        let task = &mut self.tasks[i];
        task.title = title;
        task.description = draft.description.trim().to_string();
        task.due_date = due_date;
        task.priority = draft.priority;
        self.persist()?;
        Ok(&self.tasks[i])
    }

    pub fn set_completed(&mut self, id: &str, completed: bool) -> Result<&Task> {
        let i = position(&self.tasks, id)?;
        self.tasks[i].status = if completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        self.persist()?;
        Ok(&self.tasks[i])
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let i = position(&self.tasks, id)?;
        let removed = self.tasks.remove(i);
        self.persist()?;
        Ok(removed)
    }

    /// Filtered and sorted copy of the list. Sorting is stable, so ties
    /// keep insertion order; unparseable due dates sort last.
    pub fn view(&self, filter: TaskFilter, sort: TaskSort, today: NaiveDate) -> Vec<&Task> {
        let today = format_date(today);
        let mut out: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| match filter {
                TaskFilter::All => true,
                TaskFilter::Today => t.is_pending() && t.due_date == today,
                TaskFilter::Completed => t.status == TaskStatus::Completed,
            })
            .collect();
        match sort {
            TaskSort::DueDate => out.sort_by_key(|t| (t.due().is_none(), t.due())),
            TaskSort::Priority => out.sort_by_key(|t| t.priority.rank()),
        }
        out
    }

    fn persist(&self) -> Result<()> {
        self.store.save(TASKS_KEY, &self.tasks)?;
        Ok(())
    }
}

fn validate(draft: &TaskDraft, today: NaiveDate) -> Result<(String, String), ValidationError> {
    let title = checked_text("title", &draft.title, 3, 60)?;
    let due = parse_date(&draft.due_date)
        .ok_or_else(|| ValidationError::MalformedDate(draft.due_date.clone()))?;
    if due < today {
        return Err(ValidationError::PastDueDate {
            date: format_date(due),
            today: format_date(today),
        });
    }
    Ok((title, format_date(due)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn draft(title: &str, due: &str, priority: Priority) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: String::new(),
            due_date: due.into(),
            priority,
        }
    }

    #[test]
    fn add_validates_fields() {
        let store = MemoryStorage::new();
        let mut list = TaskList::load(&store);
        assert!(list.add(draft("ab", "2025-04-10", Priority::Low), today()).is_err());
        assert!(list.add(draft("Write", "2025-04-09", Priority::Low), today()).is_err());
        assert!(list.add(draft("Write", "tomorrow", Priority::Low), today()).is_err());

        let task = list.add(draft("Write report", "2025-04-10", Priority::High), today()).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(list.all().len(), 1);
    }

    #[test]
    fn today_filter_only_shows_pending_tasks_due_today() {
        let store = MemoryStorage::new();
        let mut list = TaskList::load(&store);
        let a = list
            .add(draft("Due today", "2025-04-10", Priority::Low), today())
            .unwrap()
            .id
            .clone();
        list.add(draft("Due later", "2025-04-12", Priority::Low), today()).unwrap();
        let c = list
            .add(draft("Done today", "2025-04-10", Priority::Low), today())
            .unwrap()
            .id
            .clone();
        list.set_completed(&c, true).unwrap();

        let ids: Vec<&str> = list
            .view(TaskFilter::Today, TaskSort::DueDate, today())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec![a.as_str()]);

        let completed = list.view(TaskFilter::Completed, TaskSort::DueDate, today());
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "Done today");
    }

    #[test]
    fn sorting_by_due_date_and_priority() {
        let store = MemoryStorage::new();
        let mut list = TaskList::load(&store);
        list.add(draft("Late low", "2025-04-20", Priority::Low), today()).unwrap();
        list.add(draft("Soon med", "2025-04-11", Priority::Medium), today()).unwrap();
        list.add(draft("Mid high", "2025-04-15", Priority::High), today()).unwrap();

        let by_due: Vec<&str> = list
            .view(TaskFilter::All, TaskSort::DueDate, today())
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(by_due, vec!["Soon med", "Mid high", "Late low"]);

        let by_priority: Vec<&str> = list
            .view(TaskFilter::All, TaskSort::Priority, today())
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(by_priority, vec!["Mid high", "Soon med", "Late low"]);
    }

    #[test]
    fn update_delete_and_reload() {
        let store = MemoryStorage::new();
        let id = {
            let mut list = TaskList::load(&store);
            let id = list
                .add(draft("Draft", "2025-04-10", Priority::Low), today())
                .unwrap()
                .id
                .clone();
            list.update(&id, draft("Final draft", "2025-04-11", Priority::Medium), today())
                .unwrap();
            list.add(draft("Scratch", "2025-04-10", Priority::Low), today()).unwrap();
            id
        };
        let mut list = TaskList::load(&store);
        assert_eq!(list.all().len(), 2);
        let task = list.get(&id).unwrap();
        assert_eq!(task.title, "Final draft");
        assert_eq!(task.priority, Priority::Medium);

        list.delete(&id).unwrap();
        assert_eq!(TaskList::load(&store).all().len(), 1);
    }

    #[test]
    fn stored_json_uses_camel_case_fields() {
        let store = MemoryStorage::new();
        let mut list = TaskList::load(&store);
        list.add(draft("Write", "2025-04-10", Priority::Low), today()).unwrap();
        let raw = store.get_raw(TASKS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"dueDate\":\"2025-04-10\""));
        assert!(raw.contains("\"status\":\"Pending\""));
    }
}
