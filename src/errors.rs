//! Unified application error type.
//! Every layer (local store, remote adapters, core, cli) returns AppError so
//! failures surface the same way whether they come from SQLite or HTTP.

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
    // Local / relational store
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Internal lock poisoned: {0}")]
    LockPoisoned(&'static str),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid history range: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("No session entry with id {0}")]
    EntryNotFound(i64),

    #[error("Nothing to save")]
    NothingToSave,

    #[error("Not signed in: configure a user or pass --user")]
    NotSignedIn,

    // ---------------------------
    // Remote store
    // ---------------------------
    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Remote store returned HTTP {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Operation not supported by this store: {0}")]
    Unsupported(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
