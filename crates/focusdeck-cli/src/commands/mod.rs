pub mod config;
pub mod dashboard;
pub mod habit;
pub mod note;
pub mod task;
pub mod timer;

use chrono::NaiveDate;
use focusdeck_core::clock::parse_date;
use focusdeck_core::{SqliteStorage, ValidationError};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_store() -> Result<SqliteStorage, Box<dyn std::error::Error>> {
    Ok(SqliteStorage::open()?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `--date` argument, defaulting to `today`.
pub fn date_arg(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    match arg {
        None => Ok(today),
        Some(s) => parse_date(s).ok_or_else(|| ValidationError::MalformedDate(s.to_string())),
    }
}
