//! Ephemeral population lifecycle engine for Strata.
//!
//! A population is a bounded, self-regulating set of short-lived records
//! (geological features, weather, creature professions) described entirely
//! by a [`PopulationSpec`]. Each evaluation runs the same pipeline:
//!
//! 1. a [`TickGate`] throttles how often the population is evaluated;
//! 2. a [`SpawnGate`] probabilistically admits new records at a valid site;
//! 3. every live record's attributes evolve ([`evolution::evolve`]);
//! 4. a [`RetentionPolicy`] removes expired, depleted, or outranked records.
//!
//! [`Simulation`] hosts any number of populations over a [`strata_core::TileMap`]
//! and an [`strata_core::EntityQuery`] with a seeded RNG, and [`Catalog`]
//! loads population specs from JSON.

/// Numeric and categorical attributes of a record.
pub mod attributes;
/// JSON catalogs of population specs, including the built-in one.
pub mod catalog;
/// Simulation clock for tracking ticks and elapsed time.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Per-evaluation context handed to populations.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Population event types and the event log.
pub mod event;
/// Attribute update rules.
pub mod evolution;
/// Tick-based evaluation throttle.
pub mod gate;
/// A spec bound to its live records.
pub mod population;
/// Record storage with monotonic ids.
pub mod registry;
/// Age, vitality, and capacity pruning.
pub mod retention;
/// Top-level simulation host.
pub mod simulation;
/// Probabilistic admission and site resolution.
pub mod spawn;
/// Data-driven population specs.
pub mod spec;

/// Re-export of [`attributes::Attributes`].
pub use attributes::Attributes;
/// Re-export of [`catalog::Catalog`].
pub use catalog::Catalog;
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::EvalContext`].
pub use context::EvalContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of the event log and event types.
pub use event::{EventLog, PopulationEvent, PopulationEventKind};
/// Re-export of [`gate::TickGate`].
pub use gate::TickGate;
/// Re-exports of population types.
pub use population::{Evaluation, Population, PopulationRecord};
/// Re-exports of registry types.
pub use registry::{Record, RecordId, Registry, Site};
/// Re-exports of retention types.
pub use retention::{Removal, RemovalReason, RetentionPolicy};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-exports of [`spawn::Admission`] and [`spawn::SpawnGate`].
pub use spawn::{Admission, SpawnGate};
/// Re-exports of spec types.
pub use spec::{
    AttributeSpec, Bound, CategorySpec, Choice, ComponentFilter, Eviction, Evolution, MAX_RADIUS,
    PopulationSpec, Retention, Schedule, SiteRule, Vitality,
};
