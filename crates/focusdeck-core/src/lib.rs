//! # Focusdeck Core Library
//!
//! Core logic for the Focusdeck personal productivity toolkit. Every
//! operation is available through the standalone CLI; this crate holds the
//! state machines and the persisted records behind it.
//!
//! ## Architecture
//!
//! - **Timer**: a two-phase focus/break countdown driven by explicit ticks,
//!   plus a monotonic [`Ticker`] that turns elapsed time into whole seconds
//! - **Habits**: completion tracking and the current-streak calculation
//! - **Tasks / Notes**: small validated CRUD lists
//! - **Storage**: an injected key-value [`Storage`] (SQLite on disk,
//!   in-memory for tests) and TOML [`Config`]
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: focus/break state machine
//! - [`FocusTimer`]: the engine bound to storage and the daily cycle counter
//! - [`calculate_streak`]: consecutive-day streak for a habit
//! - [`HabitBook`], [`TaskList`], [`NoteBook`]: persisted lists

pub mod clock;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod habit;
pub mod note;
pub mod records;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::{Dashboard, WeekStart};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use habit::{calculate_streak, Frequency, Habit, HabitBook, WeekRow};
pub use note::{Note, NoteBook, NoteSort};
pub use storage::{Config, MemoryStorage, SqliteStorage, Storage, StorageExt};
pub use task::{Priority, Task, TaskDraft, TaskFilter, TaskList, TaskSort, TaskStatus};
pub use timer::{DailyCycles, Durations, FocusTimer, Phase, Ticker, TimerEngine};
