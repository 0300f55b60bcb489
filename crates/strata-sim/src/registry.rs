use std::fmt;

use strata_core::EntityId;

/// Identifier of a record, unique within its population.
///
/// Ids start at 1 and are handed out by a strictly increasing counter.
/// An id is never reused, even after its record has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// A world tile.
    Tile {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// A creature in the host's entity store.
    Creature(EntityId),
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile { x, y } => write!(f, "({x}, {y})"),
            Self::Creature(id) => write!(f, "creature {id}"),
        }
    }
}

/// One managed instance of a population.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    /// Population-unique id.
    pub id: RecordId,
    /// Simulation tick at which the record was admitted.
    pub created_tick: u64,
    /// Where the record was admitted.
    pub site: Site,
    /// Population-specific payload.
    pub data: T,
}

impl<T> Record<T> {
    /// The creature this record is about, if it was admitted on one.
    pub fn owner(&self) -> Option<EntityId> {
        match self.site {
            Site::Creature(id) => Some(id),
            Site::Tile { .. } => None,
        }
    }

    /// Ticks elapsed since admission. Zero if `now` is earlier than creation.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_tick)
    }
}

/// Owns the live records of one population and its id allocator.
///
/// The registry has no removal primitive. Retention operates on the
/// backing list directly through [`Registry::records_mut`].
#[derive(Debug, Clone)]
pub struct Registry<T> {
    records: Vec<Record<T>>,
    next_id: u64,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Create an empty registry whose first id will be 1.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Admit a new record, stamping its id and creation tick.
    pub fn append(&mut self, created_tick: u64, site: Site, data: T) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.push(Record {
            id,
            created_tick,
            site,
            data,
        });
        id
    }

    /// The live records in insertion order.
    ///
    /// This is the backing storage, not a copy. Clone it if a snapshot must
    /// outlive the next evaluation.
    pub fn all(&self) -> &[Record<T>] {
        &self.records
    }

    /// Mutable access for evolution and retention passes.
    pub(crate) fn records_mut(&mut self) -> &mut Vec<Record<T>> {
        &mut self.records
    }

    /// Look up a live record by id.
    pub fn get(&self, id: RecordId) -> Option<&Record<T>> {
        // Ids are increasing in insertion order.
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if no records are live.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the next admission will receive.
    pub fn next_id(&self) -> RecordId {
        RecordId(self.next_id)
    }

    /// Whether any live record is owned by `entity`.
    pub fn is_owned_by(&self, entity: EntityId) -> bool {
        self.records.iter().any(|r| r.owner() == Some(entity))
    }
}
