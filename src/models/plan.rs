use super::category::{Category, PerCategory};
use super::session::UserId;
use serde::Serialize;

pub const DEFAULT_DAILY_GOAL: u32 = 180;
pub const DEFAULT_CATEGORY_MINUTES: u32 = 45;
/// Lowest daily goal the plan editor accepts.
pub const MIN_DAILY_GOAL: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub minutes: u32,
    pub note: String,
}

/// Per-user singleton: daily goal plus a target and note per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyPlan {
    pub user_id: UserId,
    pub daily_goal_minutes: u32,
    pub items: [PlanItem; Category::COUNT],
    pub updated_at: Option<String>,
}

impl WeeklyPlan {
    /// Plan seeded at first sign-in.
    pub fn seeded(user_id: UserId) -> Self {
        let note = |s: &str| PlanItem {
            minutes: DEFAULT_CATEGORY_MINUTES,
            note: s.to_string(),
        };
        Self {
            user_id,
            daily_goal_minutes: DEFAULT_DAILY_GOAL,
            items: [
                note("Tone & Intonation"),
                note("Dvorak mvmt II"),
                note("Shostakovich Prelude"),
                note("Shifts & vibrato"),
            ],
            updated_at: None,
        }
    }

    pub fn item(&self, c: Category) -> &PlanItem {
        &self.items[c.index()]
    }

    pub fn item_mut(&mut self, c: Category) -> &mut PlanItem {
        &mut self.items[c.index()]
    }

    pub fn targets(&self) -> PerCategory<u32> {
        let mut out = PerCategory::default();
        for c in Category::ALL {
            out.set(c, self.item(c).minutes);
        }
        out
    }

    /// Sets the goal, never below `MIN_DAILY_GOAL`.
    pub fn set_daily_goal(&mut self, goal: u32) {
        self.daily_goal_minutes = goal.max(MIN_DAILY_GOAL);
    }

    /// Sum of the per-category daily targets.
    pub fn allocated_daily(&self) -> u32 {
        self.items.iter().map(|i| i.minutes).sum()
    }

    /// Goal minus allocation; negative when the categories are over-booked.
    pub fn remaining(&self) -> i64 {
        i64::from(self.daily_goal_minutes) - i64::from(self.allocated_daily())
    }
}
