use crate::attributes::Attributes;
use crate::registry::{Record, RecordId};
use crate::spec::{Eviction, PopulationSpec, Vitality};

/// Why a record was removed.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovalReason {
    /// Older than the retention window.
    Expired {
        /// Age in ticks at removal.
        age: u64,
    },
    /// The vitality attribute hit its terminal bound.
    Depleted {
        /// Final value of the vitality attribute.
        value: f64,
    },
    /// Ranked out by capacity eviction.
    Evicted {
        /// Fitness score at removal.
        fitness: f64,
    },
}

/// A record removed by a retention pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// The removed record's id.
    pub id: RecordId,
    /// Why it went.
    pub reason: RemovalReason,
}

/// Age, vitality, and capacity pruning for one population.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    window: u64,
    max_population: usize,
    vitality: Option<Vitality>,
    eviction: Option<Eviction>,
}

impl RetentionPolicy {
    /// Build the policy for a validated spec.
    pub fn from_spec(spec: &PopulationSpec) -> Self {
        Self {
            window: spec.retention.window,
            max_population: spec.schedule.max_population,
            vitality: spec.retention.vitality.clone(),
            eviction: spec.retention.eviction.clone(),
        }
    }

    /// Remove expired, depleted, and (if configured) excess records.
    ///
    /// Age and vitality are checked together in one reverse pass so that
    /// in-place removal never skips an element. Either criterion suffices.
    /// Eviction then keeps the `max_population` fittest survivors; ties go
    /// to the older record, and survivors keep their insertion order.
    pub fn apply(&self, records: &mut Vec<Record<Attributes>>, now: u64) -> Vec<Removal> {
        let mut removed = Vec::new();

        for i in (0..records.len()).rev() {
            let record = &records[i];
            let age = record.age(now);
            let reason = if age > self.window {
                Some(RemovalReason::Expired { age })
            } else {
                self.depleted_value(&record.data)
                    .map(|value| RemovalReason::Depleted { value })
            };
            if let Some(reason) = reason {
                let id = records.remove(i).id;
                removed.push(Removal { id, reason });
            }
        }

        if let Some(eviction) = &self.eviction
            && records.len() > self.max_population
        {
            removed.extend(self.evict(eviction, records));
        }
        removed
    }

    fn depleted_value(&self, attrs: &Attributes) -> Option<f64> {
        let vitality = self.vitality.as_ref()?;
        let value = attrs.get(&vitality.attribute)?;
        vitality.bound.is_terminal(value).then_some(value)
    }

    fn evict(&self, eviction: &Eviction, records: &mut Vec<Record<Attributes>>) -> Vec<Removal> {
        let fitness = |r: &Record<Attributes>| r.data.get(&eviction.fitness).unwrap_or(f64::NEG_INFINITY);

        let mut ranked: Vec<usize> = (0..records.len()).collect();
        // Stable sort: equal fitness keeps insertion order.
        ranked.sort_by(|&a, &b| fitness(&records[b]).total_cmp(&fitness(&records[a])));

        let mut doomed = vec![false; records.len()];
        for &i in &ranked[self.max_population..] {
            doomed[i] = true;
        }

        let mut removed = Vec::new();
        for i in (0..records.len()).rev() {
            if doomed[i] {
                let record = records.remove(i);
                removed.push(Removal {
                    id: record.id,
                    reason: RemovalReason::Evicted {
                        fitness: fitness(&record),
                    },
                });
            }
        }
        removed
    }
}
