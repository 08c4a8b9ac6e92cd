pub mod auth;
pub mod autosave;
pub mod calculator;
pub mod notify;
pub mod reconciler;
pub mod repository;
