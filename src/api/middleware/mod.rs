//! API middleware stack.
//!
//! Execution order (outermost to innermost):
//! 1. Audit logger, so rejected requests are logged too
//! 2. Caller identity (protected routes only)

pub mod audit;
pub mod auth;
