/// Tracks simulation time: a monotonic tick counter and elapsed host time.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    dt: f64,
    elapsed: f64,
}

impl SimClock {
    /// Create a new clock at tick 0 where each tick lasts `dt` seconds.
    pub fn new(dt: f64) -> Self {
        Self {
            tick: 0,
            dt,
            elapsed: 0.0,
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.elapsed += self.dt;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Total elapsed seconds since the simulation started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = SimClock::new(1.0);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = SimClock::new(0.5);
        clock.advance();
        clock.advance();
        assert_eq!(clock.advance(), 3);
        assert!((clock.elapsed() - 1.5).abs() < f64::EPSILON);
    }
}
