//! Virtual-time timers for the game loops.
//!
//! Every game owns one `Scheduler` and pumps it from its `update`:
//! `advance` moves the target time forward, then `pop_due` hands out fired
//! timers one at a time in due order. Pulling one timer at a time means a
//! handler that cancels other timers, or stops the scheduler outright, takes
//! effect before anything else fires in the same tick.

use std::time::Duration;

/// Session generation. Bumped on every `reset`; timers remember the
/// generation they were created under so a stale callback can be discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub(crate) u64);

/// A timer that came due.
#[derive(Clone, Debug)]
pub struct Fired<E> {
    pub id: TimerId,
    pub event: E,
    pub generation: Generation,
    pub at_ms: u64,
}

struct Timer<E> {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    event: E,
    generation: Generation,
}

pub struct Scheduler<E> {
    now_ms: u64,
    target_ms: u64,
    carry_us: u64,
    next_id: u64,
    generation: Generation,
    running: bool,
    timers: Vec<Timer<E>>,
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            target_ms: 0,
            carry_us: 0,
            next_id: 0,
            generation: Generation::default(),
            running: false,
            timers: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Cancels every pending timer and stops accepting time.
    pub fn stop(&mut self) {
        self.running = false;
        self.timers.clear();
        self.target_ms = self.now_ms;
    }

    /// Stop, move to a fresh generation, and start again.
    pub fn reset(&mut self) -> Generation {
        self.stop();
        self.generation = self.generation.next();
        self.start();
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Repeating timer, first fire one period from now.
    pub fn every(&mut self, period_ms: u64, event: E) -> TimerId {
        let period_ms = period_ms.max(1);
        self.push(self.now_ms + period_ms, Some(period_ms), event)
    }

    /// One-shot timer.
    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.push(self.now_ms + delay_ms, None, event)
    }

    fn push(&mut self, due_ms: u64, period_ms: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms,
            period_ms,
            event,
            generation: self.generation,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn advance(&mut self, dt_ms: u64) {
        if !self.running {
            return;
        }
        self.target_ms += dt_ms;
    }

    /// Like `advance`, carrying the sub-millisecond remainder to the next call.
    pub fn advance_by(&mut self, dt: Duration) {
        if !self.running {
            return;
        }
        let micros = self.carry_us + dt.as_micros().min(u64::MAX as u128) as u64;
        self.carry_us = micros % 1000;
        self.advance(micros / 1000);
    }

    /// Pops the earliest timer due at or before the target time. Ties fire in
    /// creation order. Once nothing is due, the clock settles on the target.
    pub fn pop_due(&mut self) -> Option<Fired<E>> {
        if !self.running {
            return None;
        }

        let target = self.target_ms;
        let next = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= target)
            .min_by_key(|(_, t)| (t.due_ms, t.id.0))
            .map(|(i, _)| i);

        let Some(idx) = next else {
            self.now_ms = target;
            return None;
        };

        let due = self.timers[idx].due_ms;
        self.now_ms = due;

        let fired = match self.timers[idx].period_ms {
            Some(period) => {
                let timer = &mut self.timers[idx];
                timer.due_ms = due + period;
                Fired {
                    id: timer.id,
                    event: timer.event.clone(),
                    generation: timer.generation,
                    at_ms: due,
                }
            }
            None => {
                let timer = self.timers.swap_remove(idx);
                Fired {
                    id: timer.id,
                    event: timer.event,
                    generation: timer.generation,
                    at_ms: due,
                }
            }
        };
        Some(fired)
    }

    pub fn is_current(&self, fired: &Fired<E>) -> bool {
        fired.generation == self.generation
    }
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
