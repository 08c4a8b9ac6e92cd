mod common;

use common::{FaultyRemote, day, repo_on, user};
use practicelog::core::repository::Repository;
use practicelog::errors::AppError;
use practicelog::models::category::Category;
use practicelog::models::plan::WeeklyPlan;
use practicelog::models::session::{NewSession, SessionPatch};
use practicelog::remote::RemoteStore;
use std::sync::Arc;

fn setup() -> (Arc<FaultyRemote>, Arc<Repository>) {
    let remote = Arc::new(FaultyRemote::new());
    let repo = repo_on(remote.clone());
    (remote, repo)
}

#[test]
fn save_replaces_placeholder_with_remote_row() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    let saved = repo.save_entries(&[(d, Category::Scales, 30)]).unwrap();
    assert_eq!(saved.len(), 1);
    let id = saved[0].id.expect("assigned id");

    let local = repo.sessions_on(d).unwrap();
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].id, Some(id));
    assert!(!local[0].key.is_placeholder());
    assert_eq!(local[0].minutes, 30);
    assert_eq!(remote.inner.count_sessions(&user()).unwrap(), 1);
}

#[test]
fn save_of_existing_slot_patches_instead_of_inserting() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    repo.save_entries(&[(d, Category::Review, 20)]).unwrap();
    repo.save_entries(&[(d, Category::Review, 35)]).unwrap();

    assert_eq!(remote.inner.count_sessions(&user()).unwrap(), 1);
    let remote_rows = remote.inner.fetch_sessions(&user(), d, d).unwrap();
    assert_eq!(remote_rows[0].minutes, 35);
    assert_eq!(repo.sessions_on(d).unwrap()[0].minutes, 35);
}

#[test]
fn zero_minute_rows_are_not_saved() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    let err = repo.save_entries(&[(d, Category::New, 0)]).unwrap_err();
    assert!(matches!(err, AppError::NothingToSave));
    assert_eq!(remote.insert_calls(), 0);
}

#[test]
fn failed_save_rolls_back_placeholders() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    FaultyRemote::set(&remote.fail_insert, true);
    let err = repo
        .save_entries(&[(d, Category::Scales, 10), (d, Category::Technique, 15)])
        .unwrap_err();
    assert!(matches!(err, AppError::Remote(_)));
    assert!(repo.sessions_on(d).unwrap().is_empty());
}

#[test]
fn short_batch_is_reported_and_keeps_only_created_rows() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    remote.insert_cap.store(1, std::sync::atomic::Ordering::SeqCst);
    let err = repo
        .save_entries(&[(d, Category::Scales, 10), (d, Category::Technique, 15)])
        .unwrap_err();
    assert!(matches!(err, AppError::Remote(ref m) if m.contains("1 of 2")));

    let local = repo.sessions_on(d).unwrap();
    assert_eq!(local.len(), 1);
    assert!(local.iter().all(|e| e.id.is_some()));
    assert_eq!(remote.inner.count_sessions(&user()).unwrap(), 1);
}

#[test]
fn save_over_stale_cache_patches_the_remote_row() {
    let (remote, repo) = setup();
    let d = day("2026-10-12");

    // Another device already reconciled the day.
    let existing = remote
        .inner
        .insert_sessions(&[NewSession::zero(user(), d, Category::Scales)])
        .unwrap();
    let id = existing[0].id.unwrap();

    let saved = repo.save_entries(&[(d, Category::Scales, 30)]).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, Some(id));
    assert_eq!(saved[0].minutes, 30);

    let rows = remote.fetch_sessions(&user(), d, d).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].minutes, 30);
    assert_eq!(repo.sessions_on(d).unwrap()[0].minutes, 30);
}

#[test]
fn save_fails_when_the_remote_cannot_be_read() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    FaultyRemote::set(&remote.fail_fetch, true);
    assert!(repo.save_entries(&[(d, Category::New, 20)]).is_err());
    assert_eq!(remote.insert_calls(), 0);
    assert!(repo.sessions_on(d).unwrap().is_empty());
}

#[test]
fn edit_and_clear_work_on_an_unsynced_cache() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    let saved = repo
        .save_entries(&[(d, Category::Scales, 10), (d, Category::Review, 20)])
        .unwrap();
    let id = saved[0].id.unwrap();

    // Fresh local store over the same remote.
    let other = repo_on(remote.clone());
    let updated = other.update_entry(id, SessionPatch::minutes(55)).unwrap();
    assert_eq!(updated.minutes, 55);
    assert_eq!(remote.fetch_session(&user(), id).unwrap().unwrap().minutes, 55);

    let fresh = repo_on(remote.clone());
    assert_eq!(fresh.clear_day(d).unwrap(), 2);
    let rows = remote.fetch_sessions(&user(), d, d).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.minutes == 0));
}

#[test]
fn failed_update_restores_previous_value() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    let id = repo.save_entries(&[(d, Category::New, 25)]).unwrap()[0]
        .id
        .unwrap();

    FaultyRemote::set(&remote.fail_update, true);
    assert!(repo.update_entry(id, SessionPatch::minutes(50)).is_err());
    assert_eq!(repo.sessions_on(d).unwrap()[0].minutes, 25);

    FaultyRemote::set(&remote.fail_update, false);
    let updated = repo
        .update_entry(
            id,
            SessionPatch {
                category: Some(Category::Technique),
                minutes: Some(50),
            },
        )
        .unwrap();
    assert_eq!(updated.category, Category::Technique);
    assert_eq!(updated.minutes, 50);
}

#[test]
fn updating_unknown_entry_fails() {
    let (_remote, repo) = setup();
    assert!(matches!(
        repo.update_entry(999, SessionPatch::minutes(1)),
        Err(AppError::EntryNotFound(999))
    ));
}

#[test]
fn clearing_keeps_rows_at_zero() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    repo.save_entries(&[(d, Category::Scales, 10), (d, Category::Review, 20)])
        .unwrap();
    assert_eq!(repo.clear_day(d).unwrap(), 2);

    let local = repo.sessions_on(d).unwrap();
    assert_eq!(local.len(), 2);
    assert!(local.iter().all(|e| e.minutes == 0));
    assert_eq!(remote.inner.count_sessions(&user()).unwrap(), 2);
}

#[test]
fn pull_drops_rows_deleted_remotely() {
    let (remote, repo) = setup();
    let d = day("2026-10-19");

    let saved = repo
        .save_entries(&[(d, Category::Scales, 10), (d, Category::Review, 20)])
        .unwrap();
    let gone = saved
        .iter()
        .find(|e| e.category == Category::Scales)
        .and_then(|e| e.id)
        .unwrap();
    remote.inner.delete_session(gone).unwrap();

    assert_eq!(repo.pull(d, d).unwrap(), 1);
    let local = repo.sessions_on(d).unwrap();
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].category, Category::Review);
}

#[test]
fn first_bootstrap_seeds_the_plan_remotely() {
    let (remote, repo) = setup();

    assert!(remote.fetch_plan(&user()).unwrap().is_none());
    let plan = repo.bootstrap(day("2026-10-19")).unwrap();

    assert_eq!(plan, WeeklyPlan::seeded(user()));
    let row = remote.fetch_plan(&user()).unwrap().expect("seeded row");
    assert_eq!(row.daily_goal, Some(180));
    assert_eq!(row.review_note.as_deref(), Some("Dvorak mvmt II"));
    assert_eq!(repo.plan().unwrap(), Some(plan));
}

#[test]
fn bootstrap_keeps_an_existing_plan() {
    let (remote, repo) = setup();
    let today = day("2026-10-19");

    let mut plan = repo.bootstrap(today).unwrap();
    plan.set_daily_goal(5);
    plan.item_mut(Category::Scales).note = "Thirds".into();
    repo.save_plan(&plan, today).unwrap();

    let other = repo_on(remote.clone());
    let loaded = other.bootstrap(today).unwrap();
    assert_eq!(loaded.daily_goal_minutes, 10);
    assert_eq!(loaded.item(Category::Scales).note, "Thirds");
    assert!(loaded.updated_at.is_some());
}

#[test]
fn bootstrap_mirrors_remote_history() {
    let (_remote, repo) = setup();
    let today = day("2026-10-19");

    repo.save_entries(&[(day("2026-09-01"), Category::New, 45)])
        .unwrap();
    repo.forget_local().unwrap();
    assert!(repo.sessions().unwrap().is_empty());
    assert!(repo.plan().unwrap().is_none());

    repo.bootstrap(today).unwrap();
    let all = repo.sessions().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].minutes, 45);
}
