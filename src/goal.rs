use chrono::Duration;

pub const MAX_EDIT_HOURS: u32 = 23;
pub const MAX_EDIT_MINUTES: u32 = 59;

/// Target fasting duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    pub hours: u32,
    pub minutes: u32,
    /// Display preference only, never affects the duration
    pub clock_24h: bool,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            clock_24h: true,
        }
    }
}

impl Goal {
    pub fn new(hours: u32, minutes: u32, clock_24h: bool) -> Self {
        Self {
            hours,
            minutes,
            clock_24h,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.hours as i64 * 60 + self.minutes as i64)
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }

    /// "Goal: 2 hours and 30 minutes", or `None` for a zero goal
    pub fn summary(&self) -> Option<String> {
        if self.is_zero() {
            return None;
        }

        let hours = match self.hours {
            0 => String::new(),
            1 => "1 hour".to_string(),
            n => format!("{} hours", n),
        };
        let minutes = match self.minutes {
            0 => String::new(),
            1 => "1 minute".to_string(),
            n => format!("{} minutes", n),
        };
        let separator = if self.hours != 0 && self.minutes != 0 {
            " and "
        } else {
            ""
        };

        Some(format!("Goal: {}{}{}", hours, separator, minutes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GoalField {
    Hours,
    Minutes,
}

impl GoalField {
    fn max(&self) -> u32 {
        match self {
            GoalField::Hours => MAX_EDIT_HOURS,
            GoalField::Minutes => MAX_EDIT_MINUTES,
        }
    }

    fn other(&self) -> Self {
        match self {
            GoalField::Hours => GoalField::Minutes,
            GoalField::Minutes => GoalField::Hours,
        }
    }
}

/// Modal hour/minute input. Holds a draft only; nothing is stored until
/// the caller takes the value returned by [`GoalEditor::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEditor {
    pub hours: u32,
    pub minutes: u32,
    pub clock_24h: bool,
    pub focus: GoalField,
    /// digits typed into the focused field since it gained focus
    typed: u8,
}

impl GoalEditor {
    pub fn open(saved: Goal) -> Self {
        Self {
            hours: saved.hours,
            minutes: saved.minutes,
            clock_24h: saved.clock_24h,
            focus: GoalField::Hours,
            typed: 0,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.other();
        self.typed = 0;
    }

    pub fn increment(&mut self) {
        let max = self.focus.max();
        let value = self.value_mut();
        *value = if *value >= max { 0 } else { *value + 1 };
        self.typed = 0;
    }

    pub fn decrement(&mut self) {
        let max = self.focus.max();
        let value = self.value_mut();
        *value = if *value == 0 { max } else { *value - 1 };
        self.typed = 0;
    }

    /// Two-digit entry: the first digit replaces the field, the second
    /// appends to it. A full field moves focus to the next one.
    pub fn type_digit(&mut self, digit: u32) {
        if digit > 9 {
            return;
        }
        let max = self.focus.max();
        let typed = self.typed;
        let value = self.value_mut();
        *value = if typed == 0 {
            digit
        } else {
            (*value * 10 + digit).min(max)
        };

        if typed == 0 {
            self.typed = 1;
        } else {
            self.focus_next();
        }
    }

    pub fn toggle_clock_format(&mut self) {
        self.clock_24h = !self.clock_24h;
    }

    pub fn draft(&self) -> Goal {
        Goal::new(self.hours, self.minutes, self.clock_24h)
    }

    pub fn confirm(self) -> Goal {
        self.draft()
    }

    fn value_mut(&mut self) -> &mut u32 {
        match self.focus {
            GoalField::Hours => &mut self.hours,
            GoalField::Minutes => &mut self.minutes,
        }
    }
}
