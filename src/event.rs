use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind};

pub enum Event {
    Key(KeyEvent),
    /// Real time since the previous tick.
    Tick(Duration),
    Resize,
}

/// How long to wait for input before the next tick is owed.
pub fn poll_timeout(tick_rate: Duration, since_last_tick: Duration) -> Duration {
    tick_rate.checked_sub(since_last_tick).unwrap_or(Duration::ZERO)
}

/// Polls crossterm on a background thread. Ticks keep their cadence while
/// keys stream in, so typing never stalls the game clocks.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = poll_timeout(tick_rate, last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(crossterm::event::Event::Key(key)) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
                        Ok(crossterm::event::Event::Resize(..)) => Some(Event::Resize),
                        Ok(_) => None,
                        Err(err) => {
                            tracing::warn!(%err, "failed to read terminal event");
                            None
                        }
                    };
                    if let Some(ev) = forwarded {
                        if tx.send(ev).is_err() {
                            return;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick);
                    last_tick = now;
                    if tx.send(Event::Tick(dt)).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}
