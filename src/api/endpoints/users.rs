//! Account profile of the authenticated caller.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::bad_body;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db;
use crate::models::{User, UserProfile};

#[derive(Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    pub user: User,
}

/// `GET /api/users[?email=]`. The optional `email` must be the caller's own.
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(requested) = query.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if !requested.eq_ignore_ascii_case(&user.email) {
            return Err(ApiError::Forbidden(
                "Profiles are only available for your own account".into(),
            ));
        }
    }

    let profile = ctx
        .core
        .with_db(|conn| db::get_user_by_email(conn, &user.email))?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(UserResponse {
        status: "success",
        user: profile,
    }))
}

/// `PUT /api/users`: create or replace the caller's profile.
pub async fn upsert(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(profile) = payload.map_err(bad_body)?;
    profile.validate().map_err(ApiError::BadRequest)?;

    let stored = ctx
        .core
        .with_db(|conn| db::upsert_user(conn, &profile.into_user(&user.email)))?;
    tracing::info!(id = %stored.id, role = stored.role.as_str(), "User profile saved");

    Ok(Json(UserResponse {
        status: "success",
        user: stored,
    }))
}
