use std::sync::mpsc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use fastwatch::app::{App, KeyOutcome};
use fastwatch::chime::Chime;
use fastwatch::goal::Goal;
use fastwatch::prefs::MemoryStore;
use fastwatch::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use fastwatch::timer::ManualClock;

/// Shares its play count with the test body
struct SharedChime(std::rc::Rc<std::cell::Cell<usize>>);

impl Chime for SharedChime {
    fn play(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn headless_app() -> (
    App<MemoryStore>,
    ManualClock,
    std::rc::Rc<std::cell::Cell<usize>>,
) {
    let clock = ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap(),
    );
    let plays = std::rc::Rc::new(std::cell::Cell::new(0));
    let app = App::new(
        MemoryStore::new(),
        Box::new(clock.clone()),
        Box::new(SharedChime(plays.clone())),
    );
    (app, clock, plays)
}

// Drives the app the way the binary does: the runner yields key events
// while queued and falls back to ticks once the queue is empty.
#[test]
fn headless_goal_then_fast_celebrates_once() {
    let (mut app, clock, plays) = headless_app();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    // goal 0h01m, confirm, then start
    for ev in [key('g'), key('0'), key('0'), key('0'), key('1')] {
        tx.send(ev).unwrap();
    }
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();
    tx.send(key(' ')).unwrap();

    for _ in 0..7 {
        match runner.step() {
            AppEvent::Key(k) => {
                assert_matches!(app.on_key(k), KeyOutcome::Redraw);
            }
            other => panic!("expected queued key, got {:?}", other),
        }
    }
    assert_eq!(app.goal, Goal::new(0, 1, true));
    assert!(app.timer.is_running());

    let mut celebrations = 0;
    for _ in 0..180 {
        clock.advance_secs(1);
        if let AppEvent::Tick = runner.step() {
            app.on_tick(0.1);
        }
        // count trigger edges through the chime
        celebrations = plays.get();
    }

    assert!(app.goal_reached());
    assert_eq!(celebrations, 1, "celebration must not loop on later ticks");
}

#[test]
fn headless_goal_edit_refires_celebration() {
    let (mut app, clock, plays) = headless_app();
    app.toggle_timer();
    clock.advance_secs(2 * 3600);
    app.on_tick(0.1);
    // zero goal is reached as soon as the fast starts
    assert_eq!(plays.get(), 1);

    // lower goal while already past it
    app.on_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE));
    app.on_key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE));
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert_eq!(app.notifier.completion_count(), 1);
    assert_eq!(plays.get(), 2);

    // raising it above elapsed clears the celebration until crossed again
    app.open_goal_editor();
    if let Some(editor) = app.editor.as_mut() {
        editor.type_digit(3);
    }
    app.confirm_goal_editor();
    assert!(!app.goal_reached());
    assert_eq!(plays.get(), 2);

    clock.advance_secs(3600);
    app.on_tick(0.1);
    assert!(app.goal_reached());
    assert_eq!(plays.get(), 3);
}

#[test]
fn headless_muted_celebration_is_silent() {
    let (mut app, clock, plays) = headless_app();
    app.toggle_music();
    app.goal = Goal::new(0, 1, true);
    app.toggle_timer();

    clock.advance_secs(61);
    app.on_tick(0.1);

    assert!(app.notifier.confetti.is_active);
    assert_eq!(plays.get(), 0);
}

#[test]
fn headless_stop_halts_clock() {
    let (mut app, clock, _) = headless_app();
    app.goal = Goal::new(8, 0, true);
    app.toggle_timer();
    clock.advance_secs(10);
    app.on_tick(0.1);
    let started = app.timer.start_time();
    app.toggle_timer();

    clock.advance_secs(100);
    assert!(!app.on_tick(0.1), "idle screen has nothing to redraw");
    assert_eq!(app.view().elapsed, None);
    assert_eq!(app.timer.start_time(), started);
}
