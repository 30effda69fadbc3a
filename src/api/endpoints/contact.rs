//! Public contact form.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::endpoints::bad_body;
use crate::api::error::ApiError;
use crate::api::types::{is_valid_email, ApiContext};
use crate::db;
use crate::models::ContactForm;

#[derive(Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
    pub id: Uuid,
}

/// `POST /api/contact` with `{name, email, message}`, all required.
pub async fn submit(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(form) = payload.map_err(bad_body)?;
    form.validate().map_err(ApiError::BadRequest)?;
    if !is_valid_email(form.email.trim()) {
        return Err(ApiError::BadRequest("Invalid email address".into()));
    }

    let message = form.into_message();
    ctx.core
        .with_db(|conn| db::insert_contact_message(conn, &message))?;
    tracing::info!(id = %message.id, "Contact message stored");

    Ok(Json(ContactResponse {
        status: "success",
        id: message.id,
    }))
}
