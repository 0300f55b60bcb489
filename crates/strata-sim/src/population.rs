use tracing::{debug, trace};

use crate::attributes::Attributes;
use crate::context::EvalContext;
use crate::error::SimResult;
use crate::event::PopulationEventKind;
use crate::evolution::evolve;
use crate::gate::TickGate;
use crate::registry::{Record, RecordId, Registry};
use crate::retention::{Removal, RemovalReason, RetentionPolicy};
use crate::spawn::{Admission, SpawnGate};
use crate::spec::PopulationSpec;

/// A live record of a spec-driven population.
pub type PopulationRecord = Record<Attributes>;

/// What one call to [`Population::update`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Whether the tick gate opened.
    pub ran: bool,
    /// Records admitted, in admission order.
    pub spawned: Vec<RecordId>,
    /// Records removed by retention.
    pub removed: Vec<Removal>,
}

impl Evaluation {
    fn skipped() -> Self {
        Self::default()
    }

    /// Records removed for age.
    pub fn expired(&self) -> usize {
        self.count(|r| matches!(r, RemovalReason::Expired { .. }))
    }

    /// Records removed for vitality.
    pub fn depleted(&self) -> usize {
        self.count(|r| matches!(r, RemovalReason::Depleted { .. }))
    }

    /// Records removed by capacity eviction.
    pub fn evicted(&self) -> usize {
        self.count(|r| matches!(r, RemovalReason::Evicted { .. }))
    }

    fn count(&self, pred: impl Fn(&RemovalReason) -> bool) -> usize {
        self.removed.iter().filter(|r| pred(&r.reason)).count()
    }
}

/// One engine instance: a spec, its live records, and its throttle.
///
/// Each [`Population::update`] runs gate → spawn → evolve → retain to
/// completion. Nothing else touches the registry.
#[derive(Debug, Clone)]
pub struct Population {
    spec: PopulationSpec,
    gate: TickGate,
    spawn: SpawnGate,
    retention: RetentionPolicy,
    registry: Registry<Attributes>,
}

impl Population {
    /// Validate `spec` and create an empty population for it.
    pub fn new(spec: PopulationSpec) -> SimResult<Self> {
        spec.validate()?;
        Ok(Self {
            gate: TickGate::new(spec.schedule.check_interval),
            spawn: SpawnGate::from_spec(&spec),
            retention: RetentionPolicy::from_spec(&spec),
            registry: Registry::new(),
            spec,
        })
    }

    /// The population's name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The spec this population was built from.
    pub fn spec(&self) -> &PopulationSpec {
        &self.spec
    }

    /// Live records in admission order. This is the backing list itself.
    pub fn records(&self) -> &[PopulationRecord] {
        self.registry.all()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Registry<Attributes> {
        &self.registry
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Return `true` if no records are live.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Tick of the last evaluation that ran.
    pub fn last_evaluated(&self) -> Option<u64> {
        self.gate.last_evaluated()
    }

    /// Advance the population by one evaluation, if it is due.
    pub fn update(&mut self, ctx: &mut EvalContext<'_>) -> Evaluation {
        if !self.gate.try_open(ctx.tick) {
            trace!(target: "strata::population", population = %self.spec.name, tick = ctx.tick, "gate closed");
            return Evaluation::skipped();
        }

        let mut eval = Evaluation {
            ran: true,
            ..Evaluation::default()
        };

        for _ in 0..self.spawn.attempts() {
            match self.spawn.attempt(&self.spec, &mut self.registry, ctx) {
                Admission::Admitted { id, site } => {
                    debug!(
                        target: "strata::population",
                        population = %self.spec.name,
                        record = id.0,
                        tick = ctx.tick,
                        %site,
                        "spawned"
                    );
                    ctx.emit(
                        &self.spec.name,
                        PopulationEventKind::Spawned { record: id, site },
                        format!("{} {} appeared at {}", self.spec.name, id, site),
                    );
                    eval.spawned.push(id);
                }
                other => {
                    trace!(target: "strata::population", population = %self.spec.name, outcome = ?other, "no admission");
                }
            }
        }

        for record in self.registry.records_mut() {
            evolve(&self.spec, &mut record.data, ctx.rng);
        }

        eval.removed = self.retention.apply(self.registry.records_mut(), ctx.tick);
        for removal in &eval.removed {
            self.report_removal(removal, ctx);
        }
        eval
    }

    fn report_removal(&self, removal: &Removal, ctx: &mut EvalContext<'_>) {
        let name = &self.spec.name;
        let id = removal.id;
        let (kind, description) = match &removal.reason {
            RemovalReason::Expired { age } => (
                PopulationEventKind::Expired { record: id, age: *age },
                format!("{name} {id} faded after {age} ticks"),
            ),
            RemovalReason::Depleted { value } => {
                let attribute = self
                    .spec
                    .retention
                    .vitality
                    .as_ref()
                    .map(|v| v.attribute.clone())
                    .unwrap_or_default();
                let description = format!("{name} {id} ended with {attribute} at {value:.2}");
                (
                    PopulationEventKind::Depleted {
                        record: id,
                        attribute,
                        value: *value,
                    },
                    description,
                )
            }
            RemovalReason::Evicted { fitness } => (
                PopulationEventKind::Evicted {
                    record: id,
                    fitness: *fitness,
                },
                format!("{name} {id} was outranked (fitness {fitness:.2})"),
            ),
        };
        debug!(target: "strata::population", population = %name, record = id.0, tick = ctx.tick, reason = ?removal.reason, "removed");
        ctx.emit(name, kind, description);
    }
}
