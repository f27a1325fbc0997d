// Elapsed-time clocks for timed moves

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Resettable stopwatch read in milliseconds
pub trait Clock {
    fn reset(&mut self);
    fn elapsed_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct ElapsedTime {
    started: Instant,
}

impl ElapsedTime {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for ElapsedTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ElapsedTime {
    fn reset(&mut self) {
        self.started = Instant::now();
    }

    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for simulation and tests
///
/// Clones share the same reading, so one copy can be handed to the drive
/// while another advances time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: f64) {
        self.elapsed.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.elapsed.set(self.elapsed.get() + ms);
    }
}

impl Clock for ManualClock {
    fn reset(&mut self) {
        self.elapsed.set(0.0);
    }

    fn elapsed_ms(&self) -> f64 {
        self.elapsed.get()
    }
}
