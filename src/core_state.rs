//! Application state shared by every request handler.
//!
//! Owns the single SQLite connection and the model client. The connection
//! is opened on first use and released by [`CoreState::close`] at shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::{self, DatabaseError};
use crate::pipeline::llm::LlmClient;

pub struct CoreState {
    pub config: AppConfig,
    db: Mutex<Option<Connection>>,
    closed: AtomicBool,
    llm: Arc<dyn LlmClient>,
}

impl CoreState {
    /// State backed by the database file named in `config`. Nothing is
    /// opened until the first query.
    pub fn new(config: AppConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            config,
            db: Mutex::new(None),
            closed: AtomicBool::new(false),
            llm,
        }
    }

    /// State backed by a fresh in-memory database.
    pub fn in_memory(config: AppConfig, llm: Arc<dyn LlmClient>) -> Result<Self, CoreError> {
        let conn = db::open_memory_database()?;
        Ok(Self {
            config,
            db: Mutex::new(Some(conn)),
            closed: AtomicBool::new(false),
            llm,
        })
    }

    /// Run `f` against the shared connection, opening it if needed.
    pub fn with_db<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        if self.is_closed() {
            return Err(CoreError::Closed);
        }
        let mut guard = self.db.lock().map_err(|_| CoreError::LockPoisoned)?;
        if guard.is_none() {
            *guard = Some(db::open_database(&self.config.database_path)?);
        }
        match guard.as_ref() {
            Some(conn) => f(conn).map_err(CoreError::Database),
            None => Err(CoreError::Closed),
        }
    }

    pub fn llm(&self) -> Arc<dyn LlmClient> {
        Arc::clone(&self.llm)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Release the connection. Later queries fail with [`CoreError::Closed`].
    /// Calling this more than once is harmless.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::Relaxed) {
            return;
        }
        let conn = match self.db.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(conn) = conn {
            match conn.close() {
                Ok(()) => tracing::info!("Database connection closed"),
                Err((_, e)) => tracing::warn!(error = %e, "Database close reported an error"),
            }
        }
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database is closed")]
    Closed,
}
