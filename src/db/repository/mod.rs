//! Repository layer: entity-scoped database operations.

mod analysis;
mod appointment;
mod contact;
mod doctor;
mod user;

pub use analysis::*;
pub use appointment::*;
pub use contact::*;
pub use doctor::*;
pub use user::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DatabaseError;

fn parse_uuid(raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::Corrupt(format!("id {raw}: {e}")))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Corrupt(format!("timestamp {raw}: {e}")))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
