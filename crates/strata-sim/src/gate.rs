/// Throttle deciding whether a population is due for evaluation.
///
/// The gate opens when at least `interval` ticks have passed since the last
/// opening, and records the new watermark as it opens. A population that has
/// never been evaluated is always due. Missed intervals are not made up: one
/// call opens the gate at most once.
#[derive(Debug, Clone)]
pub struct TickGate {
    interval: u64,
    last_evaluated: Option<u64>,
}

impl TickGate {
    /// Create a gate that opens every `interval` ticks.
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            last_evaluated: None,
        }
    }

    /// Open the gate if due, moving the watermark to `now`.
    pub fn try_open(&mut self, now: u64) -> bool {
        let due = match self.last_evaluated {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval && now != last,
        };
        if due {
            self.last_evaluated = Some(now);
        }
        due
    }

    /// Tick of the most recent opening.
    pub fn last_evaluated(&self) -> Option<u64> {
        self.last_evaluated
    }
}
