use chrono::Duration;

use crate::celebration::ConfettiBurst;
use crate::chime::Chime;
use crate::goal::Goal;

/// Fires the celebration when a running fast reaches its goal.
///
/// A celebration is keyed on the goal edit counter: it fires once when the
/// goal is first reached and again after each goal edit while it stays
/// reached. It does not repeat on later ticks. Leaving the reached state
/// (stop or a longer goal) clears the key so the next crossing fires again.
pub struct CompletionNotifier {
    completion_count: u32,
    fired_for: Option<u32>,
    chime: Box<dyn Chime>,
    pub confetti: ConfettiBurst,
}

impl std::fmt::Debug for CompletionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionNotifier")
            .field("completion_count", &self.completion_count)
            .field("fired_for", &self.fired_for)
            .field("confetti_active", &self.confetti.is_active)
            .finish()
    }
}

pub fn goal_reached(running: bool, elapsed: Duration, goal: &Goal) -> bool {
    running && elapsed >= goal.duration()
}

impl CompletionNotifier {
    pub fn new(chime: Box<dyn Chime>) -> Self {
        Self {
            completion_count: 0,
            fired_for: None,
            chime,
            confetti: ConfettiBurst::default(),
        }
    }

    /// Goal edits since launch. Not persisted.
    pub fn completion_count(&self) -> u32 {
        self.completion_count
    }

    pub fn goal_edited(&mut self) {
        self.completion_count = self.completion_count.wrapping_add(1);
    }

    /// Returns true when this evaluation triggered a celebration
    pub fn evaluate(&mut self, reached: bool) -> bool {
        if !reached {
            self.fired_for = None;
            return false;
        }
        if self.fired_for == Some(self.completion_count) {
            return false;
        }
        self.fired_for = Some(self.completion_count);
        true
    }

    /// Evaluates and, on a trigger, plays the cue and starts the confetti
    pub fn check(&mut self, reached: bool, music_enabled: bool, width: u16, height: u16) -> bool {
        if !self.evaluate(reached) {
            return false;
        }
        log::info!("goal reached (edit #{}), celebrating", self.completion_count);
        if music_enabled {
            self.chime.play();
        }
        self.confetti.start(width, height);
        true
    }

    /// Frame advance for the visual effect
    pub fn update(&mut self, dt: f64) {
        self.confetti.update(dt);
    }
}
