use std::io::{self, Write};

/// One-shot victory cue. Implementations must not block the event loop
/// and must never fail the caller.
pub trait Chime {
    fn play(&mut self);
}

/// Rings the terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct BellChime;

impl Chime for BellChime {
    fn play(&mut self) {
        let mut out = io::stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::debug!("terminal bell failed: {}", err);
        }
    }
}

/// Counts plays instead of making noise
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingChime {
    pub plays: usize,
}

impl Chime for CountingChime {
    fn play(&mut self) {
        self.plays += 1;
    }
}

impl<C: Chime + ?Sized> Chime for Box<C> {
    fn play(&mut self) {
        (**self).play();
    }
}

#[cfg(feature = "sound")]
pub use fanfare::FanfareChime;

#[cfg(feature = "sound")]
mod fanfare {
    use super::Chime;
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, Sink};
    use std::thread;
    use std::time::Duration;

    /// (frequency Hz, milliseconds)
    const NOTES: [(f32, u64); 6] = [
        (523.25, 140),
        (659.25, 140),
        (783.99, 140),
        (1046.50, 320),
        (783.99, 140),
        (1046.50, 600),
    ];

    /// Short synthesized fanfare on the default output device.
    /// Each play runs on its own thread; overlapping plays simply overlap.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FanfareChime;

    impl Chime for FanfareChime {
        fn play(&mut self) {
            let spawned = thread::Builder::new()
                .name("fanfare".to_string())
                .spawn(|| {
                    let (_stream, handle) = match OutputStream::try_default() {
                        Ok(pair) => pair,
                        Err(err) => {
                            log::warn!("no audio output for fanfare: {}", err);
                            return;
                        }
                    };
                    let sink = match Sink::try_new(&handle) {
                        Ok(sink) => sink,
                        Err(err) => {
                            log::warn!("could not open audio sink: {}", err);
                            return;
                        }
                    };
                    for (freq, ms) in NOTES {
                        sink.append(
                            SineWave::new(freq)
                                .take_duration(Duration::from_millis(ms))
                                .amplify(0.2),
                        );
                    }
                    sink.sleep_until_end();
                });
            if let Err(err) = spawned {
                log::warn!("could not spawn fanfare thread: {}", err);
            }
        }
    }
}
