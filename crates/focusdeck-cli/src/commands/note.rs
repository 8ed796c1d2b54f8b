//! Note commands for CLI.

use clap::{Subcommand, ValueEnum};
use focusdeck_core::note::parse_tags;
use focusdeck_core::{Clock, NoteBook, NoteSort, SystemClock};

use super::{open_store, print_json, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create a note
    Add {
        /// Title (1-50 characters)
        title: String,
        /// Body (at least 10 characters)
        #[arg(long)]
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// List notes
    List {
        /// Match against title and tags
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a note
    Edit {
        /// Note ID (or unique prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Comma-separated tags (replaces existing)
        #[arg(long)]
        tags: Option<String>,
    },
    /// Star or unstar a note
    Favorite {
        /// Note ID (or unique prefix)
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note ID (or unique prefix)
        id: String,
    },
}

pub fn run(action: NoteAction) -> CmdResult {
    let store = open_store()?;
    let now = SystemClock.now();
    let mut notes = NoteBook::load(&store);

    match action {
        NoteAction::Add { title, content, tags } => {
            let note = notes.add(&title, &content, parse_tags(&tags), now)?;
            println!("Note created: {} ({})", note.title, note.id);
        }
        NoteAction::List { search, sort, json } => {
            let sort = match sort {
                SortArg::Newest => NoteSort::Newest,
                SortArg::Oldest => NoteSort::Oldest,
            };
            let view = notes.view(&search, sort);
            if json {
                print_json(&view)?;
            } else if view.is_empty() {
                println!("No notes.");
            } else {
                for n in view {
                    let star = if n.is_favorite { "*" } else { " " };
                    println!(
                        "{star} {}  {}  [{}]  {}",
                        n.id,
                        n.title,
                        n.tags.join(", "),
                        n.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        NoteAction::Edit {
            id,
            title,
            content,
            tags,
        } => {
            let current = notes.get(&id)?;
            let title = title.unwrap_or_else(|| current.title.clone());
            let content = content.unwrap_or_else(|| current.content.clone());
            let tags = tags.map_or_else(|| current.tags.clone(), |t| parse_tags(&t));
            let note = notes.update(&id, &title, &content, tags, now)?;
            println!("Note updated: {}", note.title);
        }
        NoteAction::Favorite { id } => {
            let note = notes.toggle_favorite(&id, now)?;
            let state = if note.is_favorite { "starred" } else { "unstarred" };
            println!("Note {state}: {}", note.title);
        }
        NoteAction::Delete { id } => {
            let removed = notes.delete(&id)?;
            println!("Note deleted: {}", removed.title);
        }
    }
    Ok(())
}
