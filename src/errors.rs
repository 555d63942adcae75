//! Unified application error type.
//! All modules (store, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Remote(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Lookup / input errors
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    // ---------------------------
    // Identity
    // ---------------------------
    #[error("Not signed in. Run `repmax signin` first")]
    NotSignedIn,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    EmailTaken(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    // ---------------------------
    // Workout session
    // ---------------------------
    #[error("An unfinished workout is waiting. Run `repmax resume` to continue it or `repmax resume --end` to save it")]
    SessionPending,

    #[error("No workout in progress")]
    NoActiveSession,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    /// True for failures of the backing store itself (as opposed to a
    /// missing document or bad input).
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Db(_) | AppError::Remote(_) | AppError::Io(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
