use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::chime::Chime;
use crate::goal::{Goal, GoalEditor};
use crate::notifier::{goal_reached, CompletionNotifier};
use crate::prefs::{KeyValueStore, Preferences};
use crate::timer::{Clock, FastTimer, TimerState};
use crate::view::ScreenView;

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Redraw,
    Ignored,
    Quit,
}

/// The single screen. Owns the in-memory copy of every setting and writes
/// each change through to the preference store as it happens.
pub struct App<S: KeyValueStore> {
    pub prefs: Preferences<S>,
    pub timer: FastTimer,
    pub goal: Goal,
    pub music_enabled: bool,
    pub editor: Option<GoalEditor>,
    pub notifier: CompletionNotifier,
    clock: Box<dyn Clock>,
    area: (u16, u16),
}

impl<S: KeyValueStore> App<S> {
    /// Rebuilds the screen from whatever was persisted last time
    pub fn new(store: S, clock: Box<dyn Clock>, chime: Box<dyn Chime>) -> Self {
        let prefs = Preferences::new(store);
        let now = clock.now();
        let timer = FastTimer::restore(prefs.get_running(), prefs.get_start_time(now), &*clock);
        let goal = prefs.get_goal();
        let music_enabled = prefs.get_music_enabled();
        log::debug!(
            "restored state={} start={} goal={:?} music={}",
            timer.state(),
            timer.start_time(),
            goal,
            music_enabled
        );

        let mut app = Self {
            prefs,
            timer,
            goal,
            music_enabled,
            editor: None,
            notifier: CompletionNotifier::new(chime),
            clock,
            area: (80, 24),
        };
        app.check_completion();
        app
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = (width, height);
        self.notifier.confetti.resize(width, height);
    }

    pub fn toggle_timer(&mut self) {
        match self.timer.toggle(&*self.clock) {
            TimerState::Running => {
                self.prefs.set_start_time(self.timer.start_time());
                self.prefs.set_running(true);
            }
            TimerState::Idle => self.prefs.set_running(false),
        }
        self.check_completion();
    }

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        self.prefs.set_music_enabled(self.music_enabled);
        log::info!("music {}", if self.music_enabled { "on" } else { "off" });
    }

    pub fn open_goal_editor(&mut self) {
        if self.editor.is_none() {
            self.editor = Some(GoalEditor::open(self.prefs.get_goal()));
        }
    }

    /// Closes the editor, leaving the stored goal as it was
    pub fn cancel_goal_editor(&mut self) {
        self.editor = None;
    }

    pub fn confirm_goal_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        self.goal = editor.confirm();
        self.prefs.set_goal(self.goal);
        self.notifier.goal_edited();
        log::info!("goal set to {}h {}m", self.goal.hours, self.goal.minutes);
        self.check_completion();
    }

    /// Frame tick: resample elapsed time when due, re-check the goal and
    /// advance the confetti. Returns true when the screen needs a redraw.
    pub fn on_tick(&mut self, dt: f64) -> bool {
        let sampled = self.timer.on_tick(&*self.clock);
        let celebrated = sampled && self.check_completion();
        let animating = self.notifier.confetti.is_active;
        self.notifier.update(dt);
        sampled || celebrated || animating
    }

    pub fn goal_reached(&self) -> bool {
        goal_reached(self.timer.is_running(), self.timer.elapsed(), &self.goal)
    }

    fn check_completion(&mut self) -> bool {
        let reached = self.goal_reached();
        let (width, height) = self.area;
        self.notifier
            .check(reached, self.music_enabled, width, height)
    }

    pub fn view(&self) -> ScreenView {
        ScreenView::from_app(self)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        if let Some(editor) = self.editor.as_mut() {
            match key.code {
                KeyCode::Esc => self.cancel_goal_editor(),
                KeyCode::Enter => self.confirm_goal_editor(),
                KeyCode::Up | KeyCode::Char('k') => editor.increment(),
                KeyCode::Down | KeyCode::Char('j') => editor.decrement(),
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                    editor.focus_next()
                }
                KeyCode::Char('f') => editor.toggle_clock_format(),
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    editor.type_digit(c.to_digit(10).unwrap_or(0))
                }
                _ => return KeyOutcome::Ignored,
            }
            return KeyOutcome::Redraw;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Quit,
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.toggle_timer();
                KeyOutcome::Redraw
            }
            KeyCode::Char('m') => {
                self.toggle_music();
                KeyOutcome::Redraw
            }
            KeyCode::Char('g') => {
                self.open_goal_editor();
                KeyOutcome::Redraw
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
