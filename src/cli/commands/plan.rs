use crate::cli::commands::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::plan::WeeklyPlan;
use crate::ui::messages::{header, success};
use crate::utils::colors::{RESET, color_for_remaining};
use crate::utils::date;
use crate::utils::formatting::{describe_remaining, pad_right};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Plan {
        goal,
        scales,
        scales_note,
        review,
        review_note,
        new_rep,
        new_note,
        technique,
        technique_note,
    } = cmd
    {
        let ctx = AppContext::open(cfg)?;
        let mut plan = ctx.plan()?;

        let edits = [
            (Category::Scales, scales, scales_note),
            (Category::Review, review, review_note),
            (Category::New, new_rep, new_note),
            (Category::Technique, technique, technique_note),
        ];

        let mut changed = false;
        if let Some(g) = goal {
            plan.set_daily_goal(*g);
            changed = true;
        }
        for (c, minutes, note) in edits {
            let item = plan.item_mut(c);
            if let Some(m) = minutes {
                item.minutes = *m;
                changed = true;
            }
            if let Some(n) = note {
                item.note = n.clone();
                changed = true;
            }
        }

        if changed {
            plan = ctx.repo.save_plan(&plan, date::today())?;
            success("Plan saved");
        }

        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &WeeklyPlan) {
    header(format!("Plan for {}", plan.user_id));
    println!("Daily goal: {} min", plan.daily_goal_minutes);
    for c in Category::ALL {
        let item = plan.item(c);
        println!("  {} {:>4} min  {}", pad_right(c.label(), 12), item.minutes, item.note);
    }
    let remaining = plan.remaining();
    println!(
        "Allocated {} min, {}{}{}",
        plan.allocated_daily(),
        color_for_remaining(remaining),
        describe_remaining(remaining),
        RESET
    );
}
