//! Hosted backend speaking the PostgREST dialect (`/rest/v1/<table>`).

use super::{NewSessionRow, PlanRow, PushSubscription, RemoteStore, SessionRow};
use crate::errors::{AppError, AppResult};
use crate::models::session::{NewSession, SessionEntry, SessionPatch, UserId};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::time::Duration;

const SESSION_COLUMNS: &str = "id,user_id,session_date,category,minutes";

pub struct RestRemote {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl RestRemote {
    pub fn new(url: &str, api_key: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            agent,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: &str, table: &str) -> ureq::Request {
        self.agent
            .request(method, &self.table_url(table))
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Accept", "application/json")
    }

    fn read_json<T: DeserializeOwned>(resp: ureq::Response) -> AppResult<T> {
        resp.into_json::<T>()
            .map_err(|e| AppError::Remote(format!("invalid response body: {e}")))
    }
}

/// Turn transport failures and non-2xx statuses into AppError.
fn map_call(res: Result<ureq::Response, ureq::Error>) -> AppResult<ureq::Response> {
    match res {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(status, resp)) => Err(AppError::RemoteStatus {
            status,
            body: resp.into_string().unwrap_or_default(),
        }),
        Err(e) => Err(AppError::Remote(e.to_string())),
    }
}

impl RemoteStore for RestRemote {
    fn fetch_sessions(&self, user: &UserId, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<SessionEntry>> {
        let resp = map_call(
            self.request("GET", "sessions")
                .query("select", SESSION_COLUMNS)
                .query("user_id", &format!("eq.{}", user))
                .query("session_date", &format!("gte.{}", from.format("%Y-%m-%d")))
                .query("session_date", &format!("lte.{}", to.format("%Y-%m-%d")))
                .query("order", "session_date.asc")
                .call(),
        )?;

        let rows: Vec<SessionRow> = Self::read_json(resp)?;
        rows.into_iter().map(SessionEntry::try_from).collect()
    }

    fn fetch_session(&self, user: &UserId, id: i64) -> AppResult<Option<SessionEntry>> {
        let resp = map_call(
            self.request("GET", "sessions")
                .query("select", SESSION_COLUMNS)
                .query("id", &format!("eq.{id}"))
                .query("user_id", &format!("eq.{}", user))
                .call(),
        )?;

        let rows: Vec<SessionRow> = Self::read_json(resp)?;
        rows.into_iter().next().map(SessionEntry::try_from).transpose()
    }

    fn insert_sessions(&self, rows: &[NewSession]) -> AppResult<Vec<SessionEntry>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let payload: Vec<NewSessionRow> = rows.iter().map(NewSessionRow::from).collect();

        let resp = map_call(
            self.request("POST", "sessions")
                .set("Prefer", "return=representation")
                .query("select", SESSION_COLUMNS)
                .send_json(serde_json::to_value(&payload)?),
        )?;

        let created: Vec<SessionRow> = Self::read_json(resp)?;
        created.into_iter().map(SessionEntry::try_from).collect()
    }

    fn update_session(&self, id: i64, patch: &SessionPatch) -> AppResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let resp = map_call(
            self.request("PATCH", "sessions")
                .set("Prefer", "return=representation")
                .query("id", &format!("eq.{id}"))
                .send_json(serde_json::to_value(patch)?),
        )?;

        let updated: Vec<serde_json::Value> = Self::read_json(resp)?;
        if updated.is_empty() {
            return Err(AppError::EntryNotFound(id));
        }
        Ok(())
    }

    fn delete_session(&self, id: i64) -> AppResult<()> {
        map_call(
            self.request("DELETE", "sessions")
                .query("id", &format!("eq.{id}"))
                .call(),
        )?;
        Ok(())
    }

    fn fetch_plan(&self, user: &UserId) -> AppResult<Option<PlanRow>> {
        let resp = map_call(
            self.request("GET", "plan")
                .query("select", "*")
                .query("user_id", &format!("eq.{}", user))
                .call(),
        )?;

        let rows: Vec<PlanRow> = Self::read_json(resp)?;
        Ok(rows.into_iter().next())
    }

    fn insert_plan(&self, row: &PlanRow) -> AppResult<()> {
        map_call(
            self.request("POST", "plan")
                .send_json(serde_json::to_value(row)?),
        )?;
        Ok(())
    }

    fn upsert_plan(&self, row: &PlanRow) -> AppResult<()> {
        map_call(
            self.request("POST", "plan")
                .set("Prefer", "resolution=merge-duplicates")
                .query("on_conflict", "user_id")
                .send_json(serde_json::to_value(row)?),
        )?;
        Ok(())
    }

    fn fetch_push_subscriptions(&self) -> AppResult<Vec<PushSubscription>> {
        let resp = map_call(
            self.request("GET", "push_subscriptions")
                .query("select", "id,user_id,endpoint,p256dh,auth")
                .call(),
        )?;
        Self::read_json(resp)
    }
}
