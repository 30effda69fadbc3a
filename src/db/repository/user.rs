use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{User, UserRole};

/// Insert the profile, or overwrite the editable fields of the existing row
/// for the same email. Returns the stored row, whose id and `created_at`
/// survive updates.
pub fn upsert_user(conn: &Connection, user: &User) -> Result<User, DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, name, email, gender, age, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(email) DO UPDATE SET
             name = excluded.name,
             gender = excluded.gender,
             age = excluded.age,
             role = excluded.role",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            user.gender,
            user.age,
            user.role.as_str(),
            user.created_at.to_rfc3339(),
        ],
    )?;
    get_user_by_email(conn, &user.email)?.ok_or_else(|| DatabaseError::not_found("user", &user.email))
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, gender, age, role, created_at FROM users WHERE email = ?1",
        params![email],
        read_row,
    )
    .optional()?
    .map(row_to_user)
    .transpose()
}

type UserRow = (String, String, String, String, Option<u32>, String, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn row_to_user(
    (id, name, email, gender, age, role, created_at): UserRow,
) -> Result<User, DatabaseError> {
    Ok(User {
        id: parse_uuid(&id)?,
        name,
        email,
        gender,
        age,
        role: UserRole::from_str(&role)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
