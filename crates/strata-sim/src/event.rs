use crate::registry::{RecordId, Site};

/// What happened to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum PopulationEventKind {
    /// A record was admitted.
    Spawned {
        /// The new record.
        record: RecordId,
        /// Where it was admitted.
        site: Site,
    },
    /// A record outlived the retention window.
    Expired {
        /// The removed record.
        record: RecordId,
        /// Its age in ticks when removed.
        age: u64,
    },
    /// A record's vitality attribute reached its terminal bound.
    Depleted {
        /// The removed record.
        record: RecordId,
        /// The vitality attribute.
        attribute: String,
        /// Its final value.
        value: f64,
    },
    /// A record lost a capacity ranking.
    Evicted {
        /// The removed record.
        record: RecordId,
        /// Its fitness score.
        fitness: f64,
    },
}

impl PopulationEventKind {
    /// The record this event is about.
    pub fn record(&self) -> RecordId {
        match self {
            Self::Spawned { record, .. }
            | Self::Expired { record, .. }
            | Self::Depleted { record, .. }
            | Self::Evicted { record, .. } => *record,
        }
    }

    /// Whether this event removed its record.
    pub fn is_removal(&self) -> bool {
        !matches!(self, Self::Spawned { .. })
    }
}

/// A record of something that happened during an evaluation.
#[derive(Debug, Clone)]
pub struct PopulationEvent {
    /// The tick of the evaluation.
    pub tick: u64,
    /// Name of the population.
    pub population: String,
    /// The specific kind of event.
    pub kind: PopulationEventKind,
    /// A human-readable description.
    pub description: String,
}

impl PopulationEvent {
    /// Create a new event.
    pub fn new(
        tick: u64,
        population: impl Into<String>,
        kind: PopulationEventKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            population: population.into(),
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events across evaluations.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<PopulationEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: PopulationEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[PopulationEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&PopulationEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events of one population.
    pub fn events_for_population(&self, population: &str) -> Vec<&PopulationEvent> {
        self.events
            .iter()
            .filter(|e| e.population == population)
            .collect()
    }

    /// Return the history of one record.
    pub fn events_for_record(&self, population: &str, record: RecordId) -> Vec<&PopulationEvent> {
        self.events
            .iter()
            .filter(|e| e.population == population && e.kind.record() == record)
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawned(tick: u64, population: &str, id: u64) -> PopulationEvent {
        PopulationEvent::new(
            tick,
            population,
            PopulationEventKind::Spawned {
                record: RecordId(id),
                site: Site::Tile { x: 1, y: 2 },
            },
            "test",
        )
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(spawned(1, "geyser", 1));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_population("geyser").len(), 1);
        assert_eq!(log.events_for_record("geyser", RecordId(1)).len(), 1);
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(spawned(i, "geyser", i + 1));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn record_history_spans_kinds() {
        let mut log = EventLog::new(0);
        log.push(spawned(0, "mesa", 1));
        log.push(spawned(0, "canyon", 1));
        log.push(PopulationEvent::new(
            40,
            "mesa",
            PopulationEventKind::Depleted {
                record: RecordId(1),
                attribute: "height".into(),
                value: 0.5,
            },
            "mesa 1 crumbled",
        ));

        let history = log.events_for_record("mesa", RecordId(1));
        assert_eq!(history.len(), 2);
        assert!(!history[0].kind.is_removal());
        assert!(history[1].kind.is_removal());
        assert_eq!(log.events_for_population("canyon").len(), 1);
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(spawned(1, "geyser", 1));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn event_log_empty_queries() {
        let log = EventLog::new(0);
        assert!(log.events().is_empty());
        assert!(log.events_at_tick(0).is_empty());
        assert!(log.events_for_population("geyser").is_empty());
        assert!(log.is_empty());
    }
}
