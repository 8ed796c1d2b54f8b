//! Helpers shared by the list-shaped modules (habits, tasks, notes).

use uuid::Uuid;

use crate::error::ValidationError;

/// A stored item addressable by id.
pub trait Record {
    /// Human name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Fresh short identifier.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

/// Position of the record whose id is `id`, or the single record whose id
/// starts with `id`.
pub fn position<T: Record>(items: &[T], id: &str) -> Result<usize, ValidationError> {
    let not_found = || ValidationError::NotFound {
        kind: T::KIND.to_string(),
        id: id.to_string(),
    };
    if id.is_empty() {
        return Err(not_found());
    }
    if let Some(i) = items.iter().position(|item| item.id() == id) {
        return Ok(i);
    }
    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.id().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some((i, _)), None) => Ok(i),
        (Some(_), Some(_)) => Err(ValidationError::InvalidValue {
            field: "id".into(),
            message: format!("'{id}' matches more than one {}", T::KIND),
        }),
        _ => Err(not_found()),
    }
}

/// Trim `value` and check its length in characters.
pub fn checked_text(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length {
            field: field.to_string(),
            min,
            max,
            len,
        });
    }
    Ok(trimmed.to_string())
}
