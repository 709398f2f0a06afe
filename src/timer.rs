use chrono::{Duration, Local, NaiveDateTime, Timelike};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::runtime::Periodic;

/// Elapsed time is resampled this often while running
pub const SAMPLE_PERIOD: std::time::Duration = std::time::Duration::from_secs(1);

/// Wall-clock time for timestamps plus a monotonic instant for scheduling
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
    fn instant(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for tests. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Rc<Cell<(NaiveDateTime, Instant)>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            inner: Rc::new(Cell::new((now, Instant::now()))),
        }
    }

    pub fn advance(&self, by: std::time::Duration) {
        let (now, instant) = self.inner.get();
        let wall = Duration::from_std(by).unwrap_or_else(|_| Duration::zero());
        self.inner.set((now + wall, instant + by));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(std::time::Duration::from_secs(secs));
    }

    /// Moves wall-clock time only, like a user changing the system clock
    pub fn set_wall(&self, now: NaiveDateTime) {
        let (_, instant) = self.inner.get();
        self.inner.set((now, instant));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.inner.get().0
    }

    fn instant(&self) -> Instant {
        self.inner.get().1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerState {
    Idle,
    Running,
}

/// The fasting session: idle or running from a fixed start.
///
/// Elapsed time is derived, never stored. It is resampled at most once per
/// [`SAMPLE_PERIOD`] and only while running.
#[derive(Debug, Clone)]
pub struct FastTimer {
    state: TimerState,
    start_time: NaiveDateTime,
    elapsed: Duration,
    sampler: Periodic,
}

impl FastTimer {
    pub fn restore(running: bool, start_time: NaiveDateTime, clock: &dyn Clock) -> Self {
        let mut timer = Self {
            state: TimerState::Idle,
            start_time: truncate_to_second(start_time),
            elapsed: Duration::zero(),
            sampler: Periodic::new(SAMPLE_PERIOD),
        };
        if running {
            timer.state = TimerState::Running;
            timer.begin_sampling(clock);
        }
        timer
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Last sampled elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_running()
    }

    /// Idle -> Running with a fresh start time. Returns false if already running.
    pub fn start(&mut self, clock: &dyn Clock) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = TimerState::Running;
        self.start_time = truncate_to_second(clock.now());
        self.begin_sampling(clock);
        log::info!("fast started at {}", self.start_time);
        true
    }

    /// Running -> Idle. The start time is kept. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = TimerState::Idle;
        self.sampler.stop();
        log::info!("fast stopped after {}", format_elapsed(self.elapsed));
        true
    }

    pub fn toggle(&mut self, clock: &dyn Clock) -> TimerState {
        if self.is_running() {
            self.stop();
        } else {
            self.start(clock);
        }
        self.state
    }

    /// Resamples elapsed time if a sample is due. Returns true when it did.
    pub fn on_tick(&mut self, clock: &dyn Clock) -> bool {
        if !self.is_running() || !self.sampler.poll(clock.instant()) {
            return false;
        }
        self.sample(clock.now());
        true
    }

    fn begin_sampling(&mut self, clock: &dyn Clock) {
        self.sampler.start(clock.instant());
        self.on_tick(clock);
    }

    fn sample(&mut self, now: NaiveDateTime) {
        let secs = (now - self.start_time).num_seconds().max(0);
        self.elapsed = Duration::seconds(secs);
    }
}

fn truncate_to_second(t: NaiveDateTime) -> NaiveDateTime {
    t.with_nanosecond(0).unwrap_or(t)
}

/// `HH:MM:SS`; hours keep counting past 24
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}
