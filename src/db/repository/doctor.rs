use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{is_unique_violation, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Doctor;

const DOCTOR_COLUMNS: &str = "id, name, email, specialization, experience, degree, clinic_location,
     fees, contact_number, hospital_affiliation, availability, bio";

/// Insert a doctor profile. A second profile for the same email is a
/// constraint violation.
pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, email, specialization, experience, degree, clinic_location,
             fees, contact_number, hospital_affiliation, availability, bio)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.specialization,
            doctor.experience,
            doctor.degree,
            doctor.clinic_location,
            doctor.fees,
            doctor.contact_number,
            doctor.hospital_affiliation,
            doctor.availability,
            doctor.bio,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::ConstraintViolation(format!(
                "doctor profile already exists for {}",
                doctor.email
            ))
        } else {
            e.into()
        }
    })?;
    Ok(())
}

/// Overwrite the editable fields of the profile keyed by `doctor.email`.
/// The stored id is kept.
pub fn update_doctor_by_email(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET name = ?1, specialization = ?2, experience = ?3, degree = ?4,
             clinic_location = ?5, fees = ?6, contact_number = ?7, hospital_affiliation = ?8,
             availability = ?9, bio = ?10
         WHERE email = ?11",
        params![
            doctor.name,
            doctor.specialization,
            doctor.experience,
            doctor.degree,
            doctor.clinic_location,
            doctor.fees,
            doctor.contact_number,
            doctor.hospital_affiliation,
            doctor.availability,
            doctor.bio,
            doctor.email,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("doctor", &doctor.email));
    }
    Ok(())
}

pub fn get_doctor_by_email(conn: &Connection, email: &str) -> Result<Option<Doctor>, DatabaseError> {
    conn.query_row(
        &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE email = ?1"),
        params![email],
        read_row,
    )
    .optional()?
    .map(DoctorRow::into_doctor)
    .transpose()
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY name COLLATE NOCASE"
    ))?;
    let rows = stmt.query_map([], read_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)?.into_doctor())
        .collect()
}

struct DoctorRow {
    id: String,
    doctor: Doctor,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<DoctorRow> {
    Ok(DoctorRow {
        id: row.get(0)?,
        doctor: Doctor {
            id: uuid::Uuid::nil(),
            name: row.get(1)?,
            email: row.get(2)?,
            specialization: row.get(3)?,
            experience: row.get(4)?,
            degree: row.get(5)?,
            clinic_location: row.get(6)?,
            fees: row.get(7)?,
            contact_number: row.get(8)?,
            hospital_affiliation: row.get(9)?,
            availability: row.get(10)?,
            bio: row.get(11)?,
        },
    })
}

impl DoctorRow {
    fn into_doctor(self) -> Result<Doctor, DatabaseError> {
        Ok(Doctor {
            id: parse_uuid(&self.id)?,
            ..self.doctor
        })
    }
}
