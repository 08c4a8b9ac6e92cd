use super::category::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier handed out by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of an entry inside the local store.
///
/// Entries persisted remotely are keyed `remote-<id>`; optimistic writes that
/// have not been acknowledged yet carry a `local-<ulid>` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntryKey(pub String);

impl EntryKey {
    pub fn remote(id: i64) -> Self {
        Self(format!("remote-{id}"))
    }

    pub fn placeholder() -> Self {
        Self(format!("local-{}", ulid::Ulid::new()))
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with("local-")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One (date, category, minutes) record owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    pub key: EntryKey,       // ⇔ sessions.key (local store primary key)
    pub id: Option<i64>,     // ⇔ remote sessions.id, None until persisted
    pub user_id: UserId,     // ⇔ user_id
    pub date: NaiveDate,     // ⇔ session_date (TEXT "YYYY-MM-DD", local day)
    pub category: Category,  // ⇔ category ('scales','review','new','technique')
    pub minutes: u32,        // ⇔ minutes (INT >= 0)
}

impl SessionEntry {
    /// Entry acknowledged by the remote store.
    pub fn persisted(id: i64, user_id: UserId, date: NaiveDate, category: Category, minutes: u32) -> Self {
        Self {
            key: EntryKey::remote(id),
            id: Some(id),
            user_id,
            date,
            category,
            minutes,
        }
    }

    /// Optimistic entry written locally before the remote acknowledges it.
    pub fn placeholder(user_id: UserId, date: NaiveDate, category: Category, minutes: u32) -> Self {
        Self {
            key: EntryKey::placeholder(),
            id: None,
            user_id,
            date,
            category,
            minutes,
        }
    }

    pub fn apply(&mut self, patch: &SessionPatch) {
        if let Some(c) = patch.category {
            self.category = c;
        }
        if let Some(m) = patch.minutes {
            self.minutes = m;
        }
    }
}

/// Row to be created; the remote assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub category: Category,
    pub minutes: u32,
}

impl NewSession {
    pub fn zero(user_id: UserId, date: NaiveDate, category: Category) -> Self {
        Self {
            user_id,
            date,
            category,
            minutes: 0,
        }
    }
}

/// Partial update of an entry: only `Some` fields change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
}

impl SessionPatch {
    pub fn minutes(m: u32) -> Self {
        Self {
            category: None,
            minutes: Some(m),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.minutes.is_none()
    }
}
