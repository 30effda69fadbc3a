//! Appointment booking and listing.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::endpoints::bad_body;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db;
use crate::models::{AcceptanceStatus, Appointment, AppointmentView, BookingRequest};

#[derive(Deserialize)]
pub struct AppointmentQuery {
    #[serde(rename = "type")]
    pub view: Option<String>,
}

#[derive(Serialize)]
pub struct AppointmentListResponse {
    pub status: &'static str,
    pub appointments: Vec<Appointment>,
}

#[derive(Serialize)]
pub struct AppointmentResponse {
    pub status: &'static str,
    pub appointment: Appointment,
}

/// `POST /api/appointments`: book with the caller as patient. New bookings
/// start as `Pending`.
pub async fn book(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    let (date, time) = request.validate().map_err(ApiError::BadRequest)?;

    let appointment = ctx.core.with_db(|conn| {
        let doctor = db::get_doctor_by_email(conn, request.doctor_email.trim())?
            .ok_or_else(|| db::DatabaseError::not_found("doctor", request.doctor_email.trim()))?;
        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_name: doctor.name,
            doctor_email: doctor.email,
            patient_name: request.patient_name.trim().to_string(),
            patient_email: user.email.clone(),
            appointment_date: date,
            appointment_time: time,
            reason: request.reason.trim().to_string(),
            acceptance_status: AcceptanceStatus::Pending,
            created_at: Utc::now(),
        };
        db::insert_appointment(conn, &appointment)?;
        Ok(appointment)
    })?;

    tracing::info!(id = %appointment.id, date = %appointment.appointment_date, "Appointment booked");
    Ok(Json(AppointmentResponse {
        status: "success",
        appointment,
    }))
}

/// `GET /api/appointments?type=patient|doctor`: the caller's appointments
/// as patient (default) or as doctor.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<AppointmentListResponse>, ApiError> {
    let view = match query.view.as_deref() {
        None | Some("") => AppointmentView::Patient,
        Some(raw) => AppointmentView::from_str(raw)
            .map_err(|_| ApiError::BadRequest("type must be 'patient' or 'doctor'".into()))?,
    };

    let appointments = ctx.core.with_db(|conn| match view {
        AppointmentView::Patient => db::list_appointments_by_patient(conn, &user.email),
        AppointmentView::Doctor => db::list_appointments_by_doctor(conn, &user.email),
    })?;

    Ok(Json(AppointmentListResponse {
        status: "success",
        appointments,
    }))
}
