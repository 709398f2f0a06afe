use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use fastwatch::{
    app::{App, KeyOutcome},
    app_dirs::AppDirs,
    chime::Chime,
    logging,
    prefs::{FileStore, KeyValueStore},
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    timer::SystemClock,
    TICK_RATE_MS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// a calm terminal timer for intermittent fasting
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Start a fast, set a goal, and get a little confetti when you reach it. State is saved after every change, so the timer survives restarts."
)]
pub struct Cli {
    /// preferences file to use instead of the platform default
    #[clap(long, value_name = "PATH")]
    prefs: Option<PathBuf>,

    /// write logs here instead of the platform state directory
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// animation frame interval in milliseconds
    #[clap(long, default_value_t = TICK_RATE_MS, value_parser = clap::value_parser!(u64).range(10..=1000))]
    tick_ms: u64,
}

impl Cli {
    fn store(&self) -> FileStore {
        match &self.prefs {
            Some(path) => FileStore::with_path(path),
            None => FileStore::open_default(),
        }
    }

    fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(AppDirs::log_path)
    }
}

#[cfg(feature = "sound")]
fn victory_chime() -> Box<dyn Chime> {
    Box::new(fastwatch::chime::FanfareChime)
}

#[cfg(not(feature = "sound"))]
fn victory_chime() -> Box<dyn Chime> {
    Box::new(fastwatch::chime::BellChime)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_path() {
        if let Err(err) = logging::init_file_logger(&path) {
            eprintln!("logging disabled ({}): {}", path.display(), err);
        }
    }

    let store = cli.store();
    log::info!("using preferences at {}", store.path().display());
    let mut app = App::new(store, Box::new(SystemClock), victory_chime());

    let mut terminal = setup_terminal()?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(cli.tick_ms)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    let restored = teardown_terminal(&mut terminal);

    if let Err(err) = &result {
        log::error!("exiting on error: {}", err);
    }
    restored?;
    result
}

/// Raw mode plus alternate screen. Whatever was switched on is switched
/// back off if a later step fails.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    undo_on_err(execute!(stdout, EnterAlternateScreen), || {
        let _ = disable_raw_mode();
    })?;
    undo_on_err(Terminal::new(CrosstermBackend::new(stdout)), || {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    })
}

/// Attempts every restore step even if an earlier one fails
fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw.and(screen).and(cursor)
}

fn undo_on_err<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

fn start_tui<B: Backend, S: KeyValueStore, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    let mut last_frame = Instant::now();
    loop {
        let event = runner.step();

        // every iteration is a frame, so a burst of keys cannot stall sampling
        let dt = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        let mut redraw = app.on_tick(dt);

        match event {
            AppEvent::Tick => {}
            AppEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
                redraw = true;
            }
            AppEvent::Key(key) => match app.on_key(key) {
                KeyOutcome::Quit => break,
                KeyOutcome::Redraw => redraw = true,
                KeyOutcome::Ignored => {}
            },
        }

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    log::info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use fastwatch::chime::CountingChime;
    use fastwatch::prefs::MemoryStore;
    use fastwatch::runtime::TestEventSource;
    use ratatui::backend::TestBackend;
    use std::cell::Cell;
    use std::sync::mpsc;
    use std::thread;

    fn key(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["fastwatch"]);

        assert_eq!(cli.prefs, None);
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.tick_ms, TICK_RATE_MS);
    }

    #[test]
    fn test_cli_paths() {
        let cli = Cli::parse_from([
            "fastwatch",
            "--prefs",
            "/tmp/p.json",
            "--log-file",
            "/tmp/f.log",
        ]);
        assert_eq!(cli.prefs, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(cli.log_path(), Some(PathBuf::from("/tmp/f.log")));
    }

    #[test]
    fn test_cli_tick_range() {
        let cli = Cli::parse_from(["fastwatch", "--tick-ms", "50"]);
        assert_eq!(cli.tick_ms, 50);

        assert!(Cli::try_parse_from(["fastwatch", "--tick-ms", "0"]).is_err());
        assert!(Cli::try_parse_from(["fastwatch", "--tick-ms", "5000"]).is_err());
    }

    #[test]
    fn test_tick_rate_constant() {
        assert_eq!(TICK_RATE_MS, 100);
    }

    #[test]
    fn test_start_tui_quits_on_q() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)))
            .unwrap();
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();

        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        let mut app = App::new(
            MemoryStore::new(),
            Box::new(SystemClock),
            Box::<CountingChime>::default(),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        start_tui(&mut terminal, &mut app, &runner).unwrap();
        assert!(app.timer.is_running());
        assert!(app.prefs.get_running());
    }

    #[test]
    fn test_start_tui_samples_during_key_burst() {
        let (tx, rx) = mpsc::channel();
        let typist = thread::spawn(move || {
            tx.send(key(' ')).unwrap();
            // ignored keys arriving well inside every tick interval
            let until = Instant::now() + Duration::from_millis(1500);
            while Instant::now() < until {
                tx.send(key('x')).unwrap();
                thread::sleep(Duration::from_millis(20));
            }
            tx.send(key('q')).unwrap();
        });

        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(100)),
        );
        let mut app = App::new(
            MemoryStore::new(),
            Box::new(SystemClock),
            Box::<CountingChime>::default(),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        start_tui(&mut terminal, &mut app, &runner).unwrap();
        typist.join().unwrap();

        assert!(app.timer.is_running());
        assert!(app.timer.elapsed() >= chrono::Duration::seconds(1));
    }

    #[test]
    fn test_undo_on_err_runs_only_on_failure() {
        let undone = Cell::new(0);

        let ok = undo_on_err(Ok(7), || undone.set(undone.get() + 1));
        assert_eq!(ok.unwrap(), 7);
        assert_eq!(undone.get(), 0);

        let failed: io::Result<()> = undo_on_err(Err(io::Error::other("no tty")), || {
            undone.set(undone.get() + 1)
        });
        assert!(failed.is_err());
        assert_eq!(undone.get(), 1);
    }
}
