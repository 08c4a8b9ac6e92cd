use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::Sandbox;

fn init(sb: &Sandbox) {
    sb.cmd(&["init"])
        .assert()
        .success()
        .stdout(contains("Local store initialized"))
        .stdout(contains("daily goal 180 min"));
}

#[test]
fn init_without_user_only_creates_the_store() {
    let sb = Sandbox::new();
    sb.anonymous(&["init"])
        .assert()
        .success()
        .stdout(contains("No user configured"));
    assert!(std::path::Path::new(&sb.db).exists());
}

#[test]
fn commands_need_a_user() {
    let sb = Sandbox::new();
    sb.anonymous(&["today"])
        .assert()
        .failure()
        .stderr(contains("Not signed in"));
}

#[test]
fn add_then_log_shows_the_entry() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "scales", "30"])
        .assert()
        .success()
        .stdout(contains("Saved 30 min of Scales"));

    sb.cmd(&["log"])
        .assert()
        .success()
        .stdout(contains("Scales"))
        .stdout(contains("30 min"))
        .stdout(contains("Technique"))
        .stdout(contains("#"));
}

#[test]
fn add_rejects_unknown_category() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "arpeggios", "10"])
        .assert()
        .failure()
        .stderr(contains("Invalid category: arpeggios"));
}

#[test]
fn add_zero_minutes_is_refused() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "review", "0"])
        .assert()
        .failure()
        .stderr(contains("SAVE FAILED"))
        .stderr(contains("Nothing to save"));
}

#[test]
fn today_lists_every_category_against_the_plan() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "t", "20"]).assert().success();
    sb.cmd(&["today"])
        .assert()
        .success()
        .stdout(contains("Scales"))
        .stdout(contains("Review Rep"))
        .stdout(contains("New Rep"))
        .stdout(contains("Technique"))
        .stdout(contains("/  180 min"));
}

#[test]
fn edit_and_clear_an_entry() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "new", "15", "--date", "2026-03-02"])
        .assert()
        .success()
        .stdout(contains("(#1)"));

    sb.cmd(&["edit", "1", "--minutes", "40"])
        .assert()
        .success()
        .stdout(contains("Entry #1 on 2026-03-02: New Rep 40 min"));

    sb.cmd(&["clear", "2026-03-02", "--category", "new"])
        .assert()
        .success()
        .stdout(contains("Cleared New Rep on 2026-03-02"));

    sb.cmd(&["edit", "42", "--minutes", "1"])
        .assert()
        .failure()
        .stderr(contains("No session entry with id 42"));
}

#[test]
fn history_prints_consistency_and_progress() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "scales", "150"]).assert().success();
    sb.cmd(&["history", "--range", "week"])
        .assert()
        .success()
        .stdout(contains("History: last 7 days"))
        .stdout(contains("Consistency: 1/7"))
        .stdout(contains("Progress: 12%"));

    sb.cmd(&["history", "-r", "decade"])
        .assert()
        .failure()
        .stderr(contains("Invalid history range"));
}

#[test]
fn plan_edits_are_saved_and_shown() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["plan"])
        .assert()
        .success()
        .stdout(contains("Tone & Intonation"))
        .stdout(contains("Remaining 0m"));

    sb.cmd(&["plan", "--goal", "200", "--scales", "60", "--scales-note", "Thirds"])
        .assert()
        .success()
        .stdout(contains("Plan saved"))
        .stdout(contains("Daily goal: 200 min"))
        .stdout(contains("Thirds"))
        .stdout(contains("Remaining 5m"));

    sb.cmd(&["plan", "--new", "90"])
        .assert()
        .success()
        .stdout(contains("Over by 40m"));
}

#[test]
fn notify_reports_json_counts() {
    let sb = Sandbox::new();
    init(&sb);

    sb.anonymous(&["notify"])
        .assert()
        .success()
        .stdout(contains(r#"{"sent":0,"failed":0}"#));
}

#[test]
fn signout_forgets_local_cache_but_not_remote() {
    let sb = Sandbox::new();
    init(&sb);
    sb.cmd(&["add", "scales", "25", "--date", "2026-10-01"])
        .assert()
        .success();

    sb.cmd(&["signout"])
        .assert()
        .success()
        .stdout(contains("Local data of user-1 removed"));

    sb.cmd(&["sync"])
        .assert()
        .success()
        .stdout(contains("Synced 1 entries for user-1"));
}

#[test]
fn audit_lists_internal_operations() {
    let sb = Sandbox::new();
    init(&sb);
    sb.cmd(&["add", "review", "10"]).assert().success();

    sb.cmd(&["audit"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("init"))
        .stdout(contains("save"));
}

#[test]
fn config_print_shows_overrides() {
    let sb = Sandbox::new();
    sb.cmd(&["config", "--print"])
        .assert()
        .success()
        .stdout(contains("database:"))
        .stdout(contains("kind: sqlite"))
        .stdout(contains("user: user-1"))
        .stdout(contains("log_window_days: 14"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["today"])
        .env("PRACTICELOG_DEBUG_LOG", "1")
        .assert()
        .success()
        .stderr(contains("DEBUG").or(contains("INFO")))
        .stdout(contains("DEBUG").not());
}

#[test]
fn track_coalesces_timer_updates() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["track"])
        .write_stdin("scales 5\nscales 9\n\nreview 3\n")
        .assert()
        .success()
        .stdout(contains("Auto-saved 2 update(s)"));

    sb.cmd(&["log"])
        .assert()
        .success()
        .stdout(contains("   9 min"))
        .stdout(contains("   3 min"))
        .stdout(contains("   5 min").not());
}

#[test]
fn edit_and_clear_reach_rows_missing_from_the_local_cache() {
    let sb = Sandbox::new();
    init(&sb);

    sb.cmd(&["add", "review", "15", "--date", "2026-04-06"])
        .assert()
        .success();
    sb.cmd(&["signout"]).assert().success();

    sb.cmd(&["edit", "1", "--minutes", "35"])
        .assert()
        .success()
        .stdout(contains("Entry #1 on 2026-04-06: Review Rep 35 min"));

    sb.cmd(&["signout"]).assert().success();
    sb.cmd(&["clear", "2026-04-06"])
        .assert()
        .success()
        .stdout(contains("Cleared 1 entries on 2026-04-06"));
}
