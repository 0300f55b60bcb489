use rand::RngCore;
use strata_core::{EntityQuery, TileMap};

use crate::event::{EventLog, PopulationEvent, PopulationEventKind};

/// Everything one population evaluation may read, plus the RNG and event sink.
///
/// World and entity access are optional: a population whose site rule needs
/// a collaborator that is absent simply admits nothing.
pub struct EvalContext<'a> {
    /// Current simulation tick.
    pub tick: u64,
    /// Host frame delta. Carried for hosts; the built-in rules are tick-based.
    pub dt: f64,
    /// World tiles, if the host has any.
    pub tiles: Option<&'a dyn TileMap>,
    /// Entity store, if the host has one.
    pub entities: Option<&'a dyn EntityQuery>,
    /// Source of every random draw.
    pub rng: &'a mut dyn RngCore,
    /// Event sink.
    pub events: &'a mut EventLog,
}

impl EvalContext<'_> {
    /// Emit an event at the current tick.
    pub fn emit(
        &mut self,
        population: &str,
        kind: PopulationEventKind,
        description: impl Into<String>,
    ) {
        self.events
            .push(PopulationEvent::new(self.tick, population, kind, description));
    }
}
