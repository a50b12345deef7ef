/// Fixed-timestep accumulator. Converts elapsed wall-clock time into a whole
/// number of simulation ticks so shot strength and settle time do not depend
/// on the display's refresh rate.
#[derive(Debug, Clone)]
pub struct TickClock {
    step: f32,
    accumulator: f32,
    max_ticks_per_advance: u32,
}

impl TickClock {
    /// Upper bound on ticks returned by one `advance`, so a long stall does
    /// not trigger a burst of catch-up simulation.
    pub const DEFAULT_MAX_CATCH_UP: u32 = 8;

    pub fn new(tick_rate_hz: f32) -> Self {
        Self {
            step: 1.0 / tick_rate_hz.max(1.0),
            accumulator: 0.0,
            max_ticks_per_advance: Self::DEFAULT_MAX_CATCH_UP,
        }
    }

    /// Seconds per tick.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `dt` seconds and return how many ticks should run now.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_advance {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_ticks_per_advance {
            // Drop the backlog rather than spiral.
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
