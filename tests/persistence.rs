use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tempfile::tempdir;

use fastwatch::app::App;
use fastwatch::chime::CountingChime;
use fastwatch::goal::{Goal, GoalEditor};
use fastwatch::prefs::{FileStore, KeyValueStore, KEY_GOAL_24, KEY_MUSIC, KEY_START_TIME};
use fastwatch::timer::ManualClock;

fn dawn() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 2)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

fn launch(path: &std::path::Path, clock: &ManualClock) -> App<FileStore> {
    App::new(
        FileStore::with_path(path),
        Box::new(clock.clone()),
        Box::<CountingChime>::default(),
    )
}

#[test]
fn music_off_survives_relaunch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.json");
    let clock = ManualClock::new(dawn());

    let mut app = launch(&path, &clock);
    assert!(app.music_enabled);
    app.toggle_music();
    drop(app);

    let app = launch(&path, &clock);
    assert!(!app.music_enabled);
}

#[test]
fn running_fast_survives_relaunch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.json");
    let clock = ManualClock::new(dawn());

    let mut app = launch(&path, &clock);
    app.toggle_timer();
    drop(app);

    clock.advance_secs(5 * 3600 + 7);
    let app = launch(&path, &clock);
    assert!(app.timer.is_running());
    assert_eq!(app.timer.start_time(), dawn());
    assert_eq!(app.timer.elapsed(), Duration::seconds(5 * 3600 + 7));
    assert_eq!(app.view().elapsed.as_deref(), Some("05:00:07"));
}

#[test]
fn goal_and_clock_format_survive_relaunch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.json");
    let clock = ManualClock::new(dawn());

    let mut app = launch(&path, &clock);
    app.editor = Some(GoalEditor::open(Goal::new(16, 0, true)));
    if let Some(editor) = app.editor.as_mut() {
        editor.toggle_clock_format();
    }
    app.confirm_goal_editor();
    drop(app);

    let app = launch(&path, &clock);
    assert_eq!(app.goal, Goal::new(16, 0, false));
    // edit counter is not persisted
    assert_eq!(app.notifier.completion_count(), 0);
}

#[test]
fn file_layout_uses_flat_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.json");
    let clock = ManualClock::new(dawn());

    let mut app = launch(&path, &clock);
    app.toggle_timer();
    app.toggle_music();
    drop(app);

    let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["start_time"], "2024-04-02T06:00:00");
    assert_eq!(raw["started"], true);
    assert_eq!(raw["music"], false);
    assert!(raw.get("goal_hour").is_none(), "goal is only written on confirm");
}

#[test]
fn handwritten_file_is_read_leniently() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.json");
    std::fs::write(
        &path,
        r#"{ "start_time": "", "started": false, "goal_hour": 1, "goal_minute": 0, "music": "loud" }"#,
    )
    .unwrap();
    let clock = ManualClock::new(dawn());

    let app = launch(&path, &clock);
    assert_eq!(app.timer.start_time(), dawn());
    assert_eq!(app.view().goal_summary.as_deref(), Some("Goal: 1 hour"));
    // mistyped value falls back to its default
    assert!(app.music_enabled);
    assert!(app.prefs.store().get(KEY_GOAL_24).is_none());
    assert!(app.prefs.store().get(KEY_MUSIC).is_some());
    assert_eq!(
        app.prefs.store().get(KEY_START_TIME),
        Some(Value::String(String::new()))
    );
}
