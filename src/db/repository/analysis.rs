use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::AnalysisRecord;
use crate::pipeline::normalizer::AnalysisFindings;

const ANALYSIS_COLUMNS: &str = "id, owner_email, diagnosis, observations, potential_conditions,
     areas_of_concern, image_data, mime_type, created_at";

pub fn insert_analysis(conn: &Connection, record: &AnalysisRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO analyses (id, owner_email, diagnosis, observations, potential_conditions,
             areas_of_concern, image_data, mime_type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.id.to_string(),
            record.owner_email,
            record.diagnosis,
            encode_list(&record.observations)?,
            encode_list(&record.potential_conditions)?,
            encode_list(&record.areas_of_concern)?,
            record.image_data,
            record.mime_type,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Analyses owned by `owner_email`, newest first.
pub fn get_analyses_by_owner(
    conn: &Connection,
    owner_email: &str,
) -> Result<Vec<AnalysisRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ANALYSIS_COLUMNS} FROM analyses
         WHERE owner_email = ?1 COLLATE NOCASE
         ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map(params![owner_email], read_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?.into_record()?);
    }
    Ok(records)
}

/// Findings columns only, newest first. Skips the stored image.
pub fn get_findings_by_owner(
    conn: &Connection,
    owner_email: &str,
) -> Result<Vec<AnalysisFindings>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT diagnosis, observations, potential_conditions, areas_of_concern
         FROM analyses
         WHERE owner_email = ?1 COLLATE NOCASE
         ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map(params![owner_email], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut findings = Vec::new();
    for row in rows {
        let (diagnosis, observations, potential_conditions, areas_of_concern) = row?;
        findings.push(AnalysisFindings {
            diagnosis,
            observations: decode_list(&observations)?,
            potential_conditions: decode_list(&potential_conditions)?,
            areas_of_concern: decode_list(&areas_of_concern)?,
        });
    }
    Ok(findings)
}

pub fn get_analysis(conn: &Connection, id: &Uuid) -> Result<AnalysisRecord, DatabaseError> {
    conn.query_row(
        &format!("SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = ?1"),
        params![id.to_string()],
        read_row,
    )
    .optional()?
    .ok_or_else(|| DatabaseError::not_found("analysis", id))?
    .into_record()
}

struct AnalysisRow {
    id: String,
    owner_email: String,
    diagnosis: String,
    observations: String,
    potential_conditions: String,
    areas_of_concern: String,
    image_data: String,
    mime_type: String,
    created_at: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<AnalysisRow> {
    Ok(AnalysisRow {
        id: row.get(0)?,
        owner_email: row.get(1)?,
        diagnosis: row.get(2)?,
        observations: row.get(3)?,
        potential_conditions: row.get(4)?,
        areas_of_concern: row.get(5)?,
        image_data: row.get(6)?,
        mime_type: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl AnalysisRow {
    fn into_record(self) -> Result<AnalysisRecord, DatabaseError> {
        Ok(AnalysisRecord {
            id: parse_uuid(&self.id)?,
            owner_email: self.owner_email,
            diagnosis: self.diagnosis,
            observations: decode_list(&self.observations)?,
            potential_conditions: decode_list(&self.potential_conditions)?,
            areas_of_concern: decode_list(&self.areas_of_concern)?,
            image_data: self.image_data,
            mime_type: self.mime_type,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn encode_list(items: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(items).map_err(|e| DatabaseError::Corrupt(e.to_string()))
}

fn decode_list(raw: &str) -> Result<Vec<String>, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::Corrupt(format!("list column: {e}")))
}
