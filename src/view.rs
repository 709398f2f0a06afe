use chrono::NaiveDateTime;

use crate::app::App;
use crate::goal::GoalEditor;
use crate::prefs::KeyValueStore;
use crate::timer::format_elapsed;

/// Start/stop control as it should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// idle, pressing starts a fast
    Play,
    /// running, pressing ends it
    Stop,
}

impl ButtonKind {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonKind::Play => "Start fast",
            ButtonKind::Stop => "Stop fast",
        }
    }
}

/// Everything the renderer needs, derived fresh from app state
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView {
    pub music_enabled: bool,
    pub button: ButtonKind,
    /// `HH:MM:SS`, only while running
    pub elapsed: Option<String>,
    /// "Started on: ...", only while running
    pub started_on: Option<String>,
    pub goal_summary: Option<String>,
    pub editor: Option<GoalEditor>,
    pub goal_reached: bool,
}

impl ScreenView {
    pub fn from_app<S: KeyValueStore>(app: &App<S>) -> Self {
        let running = app.timer.is_running();
        let (elapsed, started_on) = if running {
            (
                Some(format_elapsed(app.timer.elapsed())),
                Some(format!(
                    "Started on: {}",
                    format_start(app.timer.start_time(), app.goal.clock_24h)
                )),
            )
        } else {
            (None, None)
        };

        Self {
            music_enabled: app.music_enabled,
            button: if running {
                ButtonKind::Stop
            } else {
                ButtonKind::Play
            },
            elapsed,
            started_on,
            goal_summary: app.goal.summary(),
            editor: app.editor.clone(),
            goal_reached: app.goal_reached(),
        }
    }
}

/// `HH:MM:SS dd/MM`, or `hh:MM:SS AM dd/MM` on a 12-hour clock
pub fn format_start(start: NaiveDateTime, clock_24h: bool) -> String {
    if clock_24h {
        start.format("%H:%M:%S %d/%m").to_string()
    } else {
        start.format("%I:%M:%S %p %d/%m").to_string()
    }
}
