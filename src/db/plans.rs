//! Local `weekly_plans` collection: one row per user, indexed by user + week.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::plan::{PlanItem, WeeklyPlan};
use crate::models::session::UserId;
use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

/// JSON shape of one element of `weekly_plans.items`.
#[derive(Serialize, Deserialize)]
struct StoredItem {
    category: Category,
    target_minutes: u32,
    #[serde(default)]
    note: Option<String>,
}

pub fn plan_key(user: &UserId) -> String {
    format!("plan-{}", user.as_str())
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn save_plan(conn: &Connection, plan: &WeeklyPlan, today: NaiveDate) -> AppResult<()> {
    let items: Vec<StoredItem> = Category::ALL
        .iter()
        .map(|c| StoredItem {
            category: *c,
            target_minutes: plan.item(*c).minutes,
            note: Some(plan.item(*c).note.clone()),
        })
        .collect();

    conn.execute(
        "INSERT INTO weekly_plans (key, user_id, week_start, daily_goal_minutes, items, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(key) DO UPDATE SET
            week_start         = excluded.week_start,
            daily_goal_minutes = excluded.daily_goal_minutes,
            items              = excluded.items,
            updated_at         = excluded.updated_at",
        params![
            plan_key(&plan.user_id),
            plan.user_id.as_str(),
            week_start(today).format("%Y-%m-%d").to_string(),
            plan.daily_goal_minutes,
            serde_json::to_string(&items)?,
            plan.updated_at,
        ],
    )?;
    Ok(())
}

pub fn load_plan(conn: &Connection, user: &UserId) -> AppResult<Option<WeeklyPlan>> {
    let row: Option<(u32, String, Option<String>)> = conn
        .query_row(
            "SELECT daily_goal_minutes, items, updated_at FROM weekly_plans WHERE user_id = ?1
             ORDER BY week_start DESC LIMIT 1",
            [user.as_str()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;

    let Some((goal, items_json, updated_at)) = row else {
        return Ok(None);
    };

    let stored: Vec<StoredItem> = serde_json::from_str(&items_json)
        .map_err(|e| AppError::Other(format!("corrupt plan items for {}: {}", user, e)))?;

    let mut items: [PlanItem; Category::COUNT] = Default::default();
    for s in stored {
        items[s.category.index()] = PlanItem {
            minutes: s.target_minutes,
            note: s.note.unwrap_or_default(),
        };
    }

    Ok(Some(WeeklyPlan {
        user_id: user.clone(),
        daily_goal_minutes: goal,
        items,
        updated_at,
    }))
}

pub fn delete_plan(conn: &Connection, user: &UserId) -> AppResult<()> {
    conn.execute("DELETE FROM weekly_plans WHERE user_id = ?1", [user.as_str()])?;
    Ok(())
}
