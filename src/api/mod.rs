//! HTTP API.
//!
//! Routes are nested under `/api/`. Public routes (health, doctor directory,
//! symptom diagnosis) skip authentication; everything else runs behind
//! [`middleware::auth::require_user`].

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::{ApiContext, UserContext};
