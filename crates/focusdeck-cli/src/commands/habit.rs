//! Habit tracker commands for CLI.

use clap::Subcommand;
use focusdeck_core::clock::format_date;
use focusdeck_core::{Clock, Frequency, HabitBook, SystemClock};
use serde::Serialize;

use super::{date_arg, open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit title (1-30 characters)
        title: String,
        /// Daily or Weekly
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
    },
    /// List habits with their current streaks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a habit's title or frequency
    Edit {
        /// Habit ID (or unique prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        frequency: Option<Frequency>,
    },
    /// Delete a habit
    Delete {
        /// Habit ID (or unique prefix)
        id: String,
    },
    /// Mark or unmark a day as complete
    Toggle {
        /// Habit ID (or unique prefix)
        id: String,
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print a habit's current streak
    Streak {
        /// Habit ID (or unique prefix)
        id: String,
    },
    /// Seven-day completion grid
    Week {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct HabitLine<'a> {
    id: &'a str,
    title: &'a str,
    frequency: Frequency,
    streak: u32,
    done_today: bool,
}

pub fn run(action: HabitAction) -> CmdResult {
    let store = open_store()?;
    let today = SystemClock.today();
    let mut book = HabitBook::load(&store);

    match action {
        HabitAction::Add { title, frequency } => {
            let habit = book.add(&title, frequency)?;
            println!("Habit added: {} ({})", habit.title, habit.id);
        }
        HabitAction::List { json } => {
            let lines: Vec<HabitLine<'_>> = book
                .list()
                .iter()
                .map(|h| HabitLine {
                    id: &h.id,
                    title: &h.title,
                    frequency: h.frequency,
                    streak: h.streak(today),
                    done_today: h.is_completed_on(today),
                })
                .collect();
            if json {
                print_json(&lines)?;
            } else if lines.is_empty() {
                println!("No habits yet.");
            } else {
                for l in &lines {
                    let mark = if l.done_today { "x" } else { " " };
                    println!(
                        "[{mark}] {}  {} ({})  streak: {} days",
                        l.id, l.title, l.frequency, l.streak
                    );
                }
            }
        }
        HabitAction::Edit { id, title, frequency } => {
            let current = book.get(&id)?;
            let title = title.unwrap_or_else(|| current.title.clone());
            let frequency = frequency.unwrap_or(current.frequency);
            let habit = book.update(&id, &title, frequency)?;
            println!("Habit updated: {} ({})", habit.title, habit.frequency);
        }
        HabitAction::Delete { id } => {
            let removed = book.delete(&id)?;
            println!("Habit deleted: {}", removed.title);
        }
        HabitAction::Toggle { id, date } => {
            let day = date_arg(date.as_deref(), today)?;
            let done = book.toggle(&id, &format_date(day), today)?;
            let title = &book.get(&id)?.title;
            if done {
                println!("Habit \"{title}\" marked complete for {}.", format_date(day));
            } else {
                println!("Habit \"{title}\" unmarked for {}.", format_date(day));
            }
        }
        HabitAction::Streak { id } => {
            println!("{}", book.streak(&id, today)?);
        }
        HabitAction::Week { json } => {
            let rows = book.week(today);
            if json {
                print_json(&rows)?;
            } else {
                for row in &rows {
                    let cells: String = row
                        .days
                        .iter()
                        .map(|(_, done)| if *done { '#' } else { '.' })
                        .collect();
                    println!("{cells}  {:>3}d  {}", row.streak, row.title);
                }
            }
        }
    }
    Ok(())
}
