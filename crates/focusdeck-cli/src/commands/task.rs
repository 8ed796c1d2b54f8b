//! Task management commands for CLI.

use clap::{Subcommand, ValueEnum};
use focusdeck_core::clock::format_date;
use focusdeck_core::{
    Clock, Priority, SystemClock, TaskDraft, TaskFilter, TaskList, TaskSort, TaskStatus,
};

use super::{open_store, print_json, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum FilterArg {
    All,
    Today,
    Completed,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    DueDate,
    Priority,
}

impl From<FilterArg> for TaskFilter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::All => TaskFilter::All,
            FilterArg::Today => TaskFilter::Today,
            FilterArg::Completed => TaskFilter::Completed,
        }
    }
}

impl From<SortArg> for TaskSort {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::DueDate => TaskSort::DueDate,
            SortArg::Priority => TaskSort::Priority,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title (3-60 characters)
        title: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// Due date as YYYY-MM-DD (default: today)
        #[arg(long)]
        due: Option<String>,
        /// Low, Medium or High
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
        #[arg(long, value_enum, default_value = "due-date")]
        sort: SortArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a task
    Edit {
        /// Task ID (or unique prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Mark a task completed
    Done {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Mark a task pending again
    Undo {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID (or unique prefix)
        id: String,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let store = open_store()?;
    let today = SystemClock.today();
    let mut tasks = TaskList::load(&store);

    match action {
        TaskAction::Add {
            title,
            description,
            due,
            priority,
        } => {
            let draft = TaskDraft {
                title,
                description,
                due_date: due.unwrap_or_else(|| format_date(today)),
                priority,
            };
            let task = tasks.add(draft, today)?;
            println!("Task created: {} ({})", task.title, task.id);
        }
        TaskAction::List { filter, sort, json } => {
            let view = tasks.view(filter.into(), sort.into(), today);
            if json {
                print_json(&view)?;
            } else if view.is_empty() {
                println!("No tasks.");
            } else {
                for t in view {
                    let mark = if t.status == TaskStatus::Completed { "x" } else { " " };
                    println!("[{mark}] {}  {}  due {}  {}", t.id, t.title, t.due_date, t.priority);
                }
            }
        }
        TaskAction::Edit {
            id,
            title,
            description,
            due,
            priority,
        } => {
            let current = tasks.get(&id)?;
            let draft = TaskDraft {
                title: title.unwrap_or_else(|| current.title.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
                due_date: due.unwrap_or_else(|| current.due_date.clone()),
                priority: priority.unwrap_or(current.priority),
            };
            let task = tasks.update(&id, draft, today)?;
            println!("Task updated: {}", task.title);
        }
        TaskAction::Done { id } => {
            let task = tasks.set_completed(&id, true)?;
            println!("Task completed: {}", task.title);
        }
        TaskAction::Undo { id } => {
            let task = tasks.set_completed(&id, false)?;
            println!("Task reopened: {}", task.title);
        }
        TaskAction::Delete { id } => {
            let removed = tasks.delete(&id)?;
            println!("Task deleted: {}", removed.title);
        }
    }
    Ok(())
}
