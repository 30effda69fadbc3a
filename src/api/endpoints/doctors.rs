//! Doctor directory.
//!
//! Listing is public. Creating and editing a profile requires a caller
//! identity; a doctor's profile is keyed by their email.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::endpoints::bad_body;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db;
use crate::models::{specializations, Doctor, DoctorFilter, DoctorProfile};

#[derive(Serialize)]
pub struct DoctorListResponse {
    pub status: &'static str,
    pub doctors: Vec<Doctor>,
    /// Every specialization in the directory, regardless of filter.
    pub specializations: Vec<String>,
}

#[derive(Serialize)]
pub struct DoctorResponse {
    pub status: &'static str,
    pub doctor: Doctor,
}

/// `GET /api/doctors[?email,q,specialization,location,max_fees,sort]`
pub async fn list(
    State(ctx): State<ApiContext>,
    filter: Result<Query<DoctorFilter>, QueryRejection>,
) -> Result<Json<DoctorListResponse>, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::BadRequest(format!("Invalid query: {e}")))?;
    let all = ctx.core.with_db(db::list_doctors)?;
    let specializations = specializations(&all);
    Ok(Json(DoctorListResponse {
        status: "success",
        doctors: filter.apply(all),
        specializations,
    }))
}

/// `POST /api/doctors`: create the caller's profile.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<DoctorProfile>, JsonRejection>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let Json(profile) = payload.map_err(bad_body)?;
    profile.validate().map_err(ApiError::BadRequest)?;

    let doctor = profile.into_doctor(Uuid::new_v4(), &user.email);
    ctx.core.with_db(|conn| db::insert_doctor(conn, &doctor))?;
    tracing::info!(id = %doctor.id, specialization = %doctor.specialization, "Doctor profile created");

    Ok(Json(DoctorResponse {
        status: "success",
        doctor,
    }))
}

/// `PUT /api/doctors`: replace the caller's profile fields.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<DoctorProfile>, JsonRejection>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let Json(profile) = payload.map_err(bad_body)?;
    profile.validate().map_err(ApiError::BadRequest)?;

    let doctor = ctx.core.with_db(|conn| {
        let existing = db::get_doctor_by_email(conn, &user.email)?
            .ok_or_else(|| db::DatabaseError::not_found("doctor", &user.email))?;
        let doctor = profile.into_doctor(existing.id, &existing.email);
        db::update_doctor_by_email(conn, &doctor)?;
        Ok(doctor)
    })?;

    Ok(Json(DoctorResponse {
        status: "success",
        doctor,
    }))
}
