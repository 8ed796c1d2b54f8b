//! Free-form notes with tags and favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::records::{checked_text, generate_id, position, Record};
use crate::storage::{Storage, StorageExt};

/// Record key for the note list.
pub const NOTES_KEY: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Note {
    const KIND: &'static str = "note";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Note {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSort {
    #[default]
    Newest,
    Oldest,
}

/// Split a comma-separated tag string, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct NoteBook<'a> {
    store: &'a dyn Storage,
    notes: Vec<Note>,
}

impl<'a> NoteBook<'a> {
    pub fn load(store: &'a dyn Storage) -> Self {
        let notes = store.load_or_default(NOTES_KEY);
        Self { store, notes }
    }

    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Result<&Note> {
        let i = position(&self.notes, id)?;
        Ok(&self.notes[i])
    }

    pub fn add(
        &mut self,
        title: &str,
        content: &str,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<&Note> {
        let (title, content) = validate(title, content)?;
        self.notes.push(Note {
            id: generate_id(),
            title,
            content,
            tags,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        });
        self.persist()?;
        Ok(&self.notes[self.notes.len() - 1])
    }

    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<&Note> {
        let i = position(&self.notes, id)?;
        let (title, content) = validate(title, content)?;
        let note = &mut self.notes[i];
        note.title = title;
        note.content = content;
        note.tags = tags;
        note.updated_at = now;
        self.persist()?;
        Ok(&self.notes[i])
    }

    pub fn toggle_favorite(&mut self, id: &str, now: DateTime<Utc>) -> Result<&Note> {
        let i = position(&self.notes, id)?;
        let note = &mut self.notes[i];
        note.is_favorite = !note.is_favorite;
        note.updated_at = now;
        self.persist()?;
        Ok(&self.notes[i])
    }

    pub fn delete(&mut self, id: &str) -> Result<Note> {
        let i = position(&self.notes, id)?;
        let removed = self.notes.remove(i);
        self.persist()?;
        Ok(removed)
    }

    /// Notes whose title or any tag contains `search` (case-insensitive),
    /// ordered by creation time.
    pub fn view(&self, search: &str, sort: NoteSort) -> Vec<&Note> {
        let needle = search.trim().to_lowercase();
        let mut out: Vec<&Note> = self
            .notes
            .iter()
            .filter(|n| needle.is_empty() || n.matches(&needle))
            .collect();
        match sort {
            NoteSort::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            NoteSort::Oldest => out.sort_by_key(|n| n.created_at),
        }
        out
    }

    fn persist(&self) -> Result<()> {
        self.store.save(NOTES_KEY, &self.notes)?;
        Ok(())
    }
}

fn validate(title: &str, content: &str) -> Result<(String, String), ValidationError> {
    let title = checked_text("title", title, 1, 50)?;
    let content = checked_text("content", content, 10, usize::MAX)?;
    Ok((title, content))
}
