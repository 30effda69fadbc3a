use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, Row};

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{AcceptanceStatus, Appointment};

const APPOINTMENT_COLUMNS: &str = "id, doctor_name, doctor_email, patient_name, patient_email,
     appointment_date, appointment_time, reason, acceptance_status, created_at";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, doctor_name, doctor_email, patient_name, patient_email,
             appointment_date, appointment_time, reason, acceptance_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            appt.id.to_string(),
            appt.doctor_name,
            appt.doctor_email,
            appt.patient_name,
            appt.patient_email,
            appt.appointment_date.format("%Y-%m-%d").to_string(),
            appt.appointment_time.format("%H:%M").to_string(),
            appt.reason,
            appt.acceptance_status.as_str(),
            appt.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Appointments booked by `patient_email`, soonest first.
pub fn list_appointments_by_patient(
    conn: &Connection,
    patient_email: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    list_where(conn, "patient_email", patient_email)
}

/// Appointments booked with `doctor_email`, soonest first.
pub fn list_appointments_by_doctor(
    conn: &Connection,
    doctor_email: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    list_where(conn, "doctor_email", doctor_email)
}

fn list_where(
    conn: &Connection,
    column: &'static str,
    email: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE {column} = ?1
         ORDER BY appointment_date, appointment_time"
    ))?;
    let rows = stmt.query_map(params![email], read_row)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(row_to_appointment(row?)?);
    }
    Ok(appointments)
}

type AppointmentRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

fn read_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    let (id, doctor_name, doctor_email, patient_name, patient_email, date, time, reason, status, created_at) =
        row;
    Ok(Appointment {
        id: parse_uuid(&id)?,
        doctor_name,
        doctor_email,
        patient_name,
        patient_email,
        appointment_date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| DatabaseError::Corrupt(format!("appointment_date {date}: {e}")))?,
        appointment_time: NaiveTime::parse_from_str(&time, "%H:%M")
            .map_err(|e| DatabaseError::Corrupt(format!("appointment_time {time}: {e}")))?,
        reason,
        acceptance_status: AcceptanceStatus::from_str(&status)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
