use std::time::Duration;

/// Longest real frame fed to the simulation; anything beyond is dropped.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);
/// Upper bound on ticks run for a single frame.
pub const MAX_SUBSTEPS: u32 = 8;

/// Frame-time accumulator that hands out fixed-size simulation ticks.
///
/// Real time is added per frame and consumed in whole steps; the remainder
/// carries over to the next frame.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(rate_hz: u32) -> Self {
        let rate_hz = rate_hz.max(1);
        Self {
            step: Duration::from_nanos(1_000_000_000 / rate_hz as u64),
            accumulator: Duration::ZERO,
        }
    }

    /// Add `elapsed` and return how many ticks are due now.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.min(MAX_FRAME_TIME);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            ticks += 1;
        }
        // Too far behind: drop the backlog instead of catching up next frame.
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Discard accumulated time, e.g. while the game is not running.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_secs(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn leftover(&self) -> Duration {
        self.accumulator
    }
}
