use rand::SeedableRng;
use rand::rngs::StdRng;
use strata_core::{EntityQuery, EntityTable, GridMap, TileMap};
use tracing::debug;

use crate::catalog::Catalog;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::EvalContext;
use crate::error::{SimError, SimResult};
use crate::event::EventLog;
use crate::population::{Evaluation, Population};
use crate::spec::PopulationSpec;

/// The top-level simulation host.
///
/// Owns the tiles, entities, clock, RNG, event log, and registered
/// populations. Each tick advances the clock and then updates every
/// population in registration order, one at a time.
pub struct Simulation<M = GridMap, E = EntityTable> {
    tiles: M,
    entities: E,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    populations: Vec<Population>,
}

impl<M, E> std::fmt::Debug for Simulation<M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("populations", &self.populations.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl<M: TileMap, E: EntityQuery> Simulation<M, E> {
    /// Create a new simulation over a tile map and an entity store.
    ///
    /// The event log keeps the newest `config.max_events` events. A limit of
    /// 0 keeps every event, so the log grows for as long as the simulation
    /// runs.
    pub fn new(tiles: M, entities: E, config: SimConfig) -> Self {
        Self {
            tiles,
            entities,
            clock: SimClock::new(config.dt),
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            populations: Vec::new(),
        }
    }

    /// Register a population. Populations are updated in registration order.
    pub fn add_population(&mut self, spec: PopulationSpec) -> SimResult<()> {
        if self.population(&spec.name).is_some() {
            return Err(SimError::DuplicatePopulation(spec.name));
        }
        self.populations.push(Population::new(spec)?);
        Ok(())
    }

    /// Register every population of a catalog, or none of them on error.
    pub fn add_catalog(&mut self, catalog: &Catalog) -> SimResult<()> {
        if let Some(taken) = catalog.names().into_iter().find(|n| self.population(n).is_some()) {
            return Err(SimError::DuplicatePopulation(taken.to_string()));
        }
        let populations = catalog.clone().into_populations()?;
        self.populations.extend(populations);
        Ok(())
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns one [`Evaluation`] per population, in registration order.
    pub fn tick(&mut self) -> Vec<Evaluation> {
        let tick = self.clock.advance();
        let mut ctx = EvalContext {
            tick,
            dt: self.clock.dt(),
            tiles: Some(&self.tiles as &dyn TileMap),
            entities: Some(&self.entities as &dyn EntityQuery),
            rng: &mut self.rng,
            events: &mut self.events,
        };

        let evaluations: Vec<Evaluation> = self
            .populations
            .iter_mut()
            .map(|population| population.update(&mut ctx))
            .collect();

        let spawned: usize = evaluations.iter().map(|e| e.spawned.len()).sum();
        let removed: usize = evaluations.iter().map(|e| e.removed.len()).sum();
        if spawned + removed > 0 {
            debug!(target: "strata::simulation", tick, spawned, removed, "tick");
        }
        evaluations
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Look up a population by name.
    pub fn population(&self, name: &str) -> Option<&Population> {
        self.populations.iter().find(|p| p.name() == name)
    }

    /// All populations in registration order.
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    /// The tile map.
    pub fn tiles(&self) -> &M {
        &self.tiles
    }

    /// The entity store.
    pub fn entities(&self) -> &E {
        &self.entities
    }

    /// Mutable access to the entity store between ticks.
    pub fn entities_mut(&mut self) -> &mut E {
        &mut self.entities
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The tick most recently simulated (0 before the first tick).
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}
