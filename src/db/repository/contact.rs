use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::ContactMessage;

pub fn insert_contact_message(conn: &Connection, msg: &ContactMessage) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO contact_messages (id, name, email, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            msg.id.to_string(),
            msg.name,
            msg.email,
            msg.message,
            msg.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}
