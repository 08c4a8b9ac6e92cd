//! Auth collaborator: the core only needs a stable user id and a way to sign out.

use crate::core::repository::Repository;
use crate::errors::{AppError, AppResult};
use crate::models::session::UserId;
use std::sync::Arc;

pub trait AuthSession {
    fn user_id(&self) -> Option<UserId>;

    fn sign_out(&self) -> AppResult<()>;

    fn require_user(&self) -> AppResult<UserId> {
        self.user_id().ok_or(AppError::NotSignedIn)
    }
}

/// Identity taken from configuration (or `--user`); signing out drops the
/// user's local cache.
pub struct ConfiguredSession {
    user: Option<UserId>,
    repo: Option<Arc<Repository>>,
}

impl ConfiguredSession {
    pub fn new(user: Option<&str>) -> Self {
        Self {
            user: user.filter(|u| !u.trim().is_empty()).map(UserId::new),
            repo: None,
        }
    }

    pub fn attach(mut self, repo: Arc<Repository>) -> Self {
        self.repo = Some(repo);
        self
    }
}

impl AuthSession for ConfiguredSession {
    fn user_id(&self) -> Option<UserId> {
        self.user.clone()
    }

    fn sign_out(&self) -> AppResult<()> {
        if let Some(repo) = &self.repo {
            let dropped = repo.forget_local()?;
            tracing::info!(user = %repo.user(), dropped, "signed out");
        }
        Ok(())
    }
}
