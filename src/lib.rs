// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod chime;
pub mod goal;
pub mod logging;
pub mod notifier;
pub mod prefs;
pub mod runtime;
pub mod timer;
pub mod ui;
pub mod view;

/// Frame interval for animation and clock refresh
pub const TICK_RATE_MS: u64 = 100;
