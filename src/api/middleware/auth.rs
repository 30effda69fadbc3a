//! Caller identity middleware.
//!
//! The identity provider in front of this service sets `X-User-Email`.
//! Requests without a well-formed address are rejected before any handler
//! runs; otherwise a [`UserContext`] is injected into request extensions.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{is_valid_email, UserContext};

pub const USER_EMAIL_HEADER: &str = "X-User-Email";

pub async fn require_user(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let email = req
        .headers()
        .get(USER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|e| is_valid_email(e))
        .map(str::to_string);

    match email {
        Some(email) => {
            req.extensions_mut().insert(UserContext { email });
            next.run(req).await
        }
        None => ApiError::Unauthorized.into_response(),
    }
}
