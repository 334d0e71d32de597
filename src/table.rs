//! The elastic hash map.
//!
//! Capacity is split once into shrinking sub-tables (see [`crate::partition`]).
//! Every operation walks them front to back and runs a bounded linear probe
//! in each. An entry never moves once placed, so a location returned by
//! [`ElasticHashMap::locate`] stays valid for the life of the table.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, error, trace, warn};

use crate::config::Config;
use crate::error::{ElasticError, Result};
use crate::partition::partition;
use crate::sub_table::{Probe, Slot, SubTable};

/// Position of an entry: sub-table number and slot index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotLocation {
    pub sub_table: usize,
    pub index: usize,
}

/// Which path a successful write took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A new key took an empty slot.
    Inserted,
    /// An existing key had its value overwritten.
    Updated,
}

#[derive(Debug)]
pub struct ElasticHashMap<K, V, S = RandomState> {
    sub_tables: Vec<SubTable<K, V>>,
    len: usize,
    capacity: usize,
    config: Config,
    hash_builder: S,
}

impl<K, V> ElasticHashMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    /// Builds a table of `capacity` slots (at least 8) with the std hasher.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> ElasticHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::build(capacity, Config::default(), hash_builder)
    }

    pub fn with_config(capacity: usize, config: Config, hash_builder: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(capacity, config, hash_builder))
    }

    fn build(requested: usize, config: Config, hash_builder: S) -> Self {
        let capacities: Vec<usize> = partition(requested, config.min_capacity);
        let capacity: usize = capacities.iter().sum();
        debug!(
            requested,
            capacity,
            sub_tables = ?capacities,
            probe_limit = config.probe_limit,
            max_fill_percent = config.max_fill_percent,
            "elastic table built"
        );
        ElasticHashMap {
            sub_tables: capacities.into_iter().map(SubTable::with_capacity).collect(),
            len: 0,
            capacity,
            config,
            hash_builder,
        }
    }

    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(key)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots across all sub-tables, after clamping.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity as f64
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    pub fn sub_table_capacities(&self) -> Vec<usize> {
        self.sub_tables.iter().map(SubTable::capacity).collect()
    }

    /// Occupied-slot count per sub-table, in probe order.
    pub fn occupancy(&self) -> Vec<usize> {
        self.sub_tables.iter().map(SubTable::occupied).collect()
    }

    fn locate_hashed<Q>(&self, hash: u64, key: &Q) -> Option<SlotLocation>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let limit: usize = self.config.probe_limit;
        for (sub_table, sub) in self.sub_tables.iter().enumerate() {
            // Vacant and Exhausted both mean "not here, try the next one".
            if let Probe::Found(index) = sub.probe(hash, key, limit) {
                return Some(SlotLocation { sub_table, index });
            }
        }
        None
    }

    /// Where `key` lives, if present.
    pub fn locate<Q>(&self, key: &Q) -> Option<SlotLocation>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.locate_hashed(self.hash(key), key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let loc: SlotLocation = self.locate(key)?;
        self.sub_tables[loc.sub_table].value(loc.index)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let loc: SlotLocation = self.locate(key)?;
        self.sub_tables[loc.sub_table].value_mut(loc.index)
    }

    /// Overwrites the value of an existing key. Returns false, and changes
    /// nothing, when the key is absent.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash: u64 = self.hash(key);
        self.update_hashed(hash, key, value).is_ok()
    }

    /// Hands `value` back when the key is not present.
    fn update_hashed<Q>(&mut self, hash: u64, key: &Q, value: V) -> std::result::Result<(), V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self.locate_hashed(hash, key) {
            Some(loc) => match self.sub_tables[loc.sub_table].value_mut(loc.index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(value),
            },
            None => Err(value),
        }
    }

    fn insert_hashed(&mut self, hash: u64, key: K, value: V) -> Result<(Placement, SlotLocation)> {
        let limit: usize = self.config.probe_limit;
        let max_fill: usize = self.config.max_fill_percent;
        for (sub_table, sub) in self.sub_tables.iter_mut().enumerate() {
            if !sub.is_eligible(max_fill) {
                trace!(sub_table, occupied = sub.occupied(), "sub-table above fill ceiling, skipping");
                continue;
            }
            match sub.probe(hash, &key, limit) {
                Probe::Found(index) => {
                    if let Some(slot) = sub.value_mut(index) {
                        *slot = value;
                    }
                    return Ok((Placement::Updated, SlotLocation { sub_table, index }));
                }
                Probe::Vacant(index) => {
                    sub.place(index, key, value);
                    debug_assert!(sub.chain_is_contiguous(sub.base(hash), index));
                    self.len += 1;
                    return Ok((Placement::Inserted, SlotLocation { sub_table, index }));
                }
                Probe::Exhausted => {
                    trace!(sub_table, "probe bound exhausted, skipping");
                }
            }
        }
        warn!(
            len = self.len,
            capacity = self.capacity,
            occupancy = ?self.occupancy(),
            "insertion failed: no admissible slot"
        );
        Err(ElasticError::InsertionFailed {
            capacity: self.capacity,
            sub_tables: self.sub_tables.len(),
        })
    }

    /// Inserts `key` or overwrites its value.
    ///
    /// Fails with [`ElasticError::InsertionFailed`] when the key is new and no
    /// sub-table can take it. The table is left untouched in that case.
    pub fn upsert(&mut self, key: K, value: V) -> Result<Placement> {
        let hash: u64 = self.hash(&key);
        match self.update_hashed(hash, &key, value) {
            Ok(()) => Ok(Placement::Updated),
            Err(value) => self.insert_hashed(hash, key, value).map(|(placement, _)| placement),
        }
    }

    /// Returns the value for `key`, inserting a fresh `V::default()` first if
    /// the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> Result<&mut V>
    where
        V: Default,
    {
        let hash: u64 = self.hash(&key);
        let loc: SlotLocation = match self.locate_hashed(hash, &key) {
            Some(loc) => loc,
            None => {
                let (_, placed) = self.insert_hashed(hash, key, V::default())?;
                self.resolve_placed(placed)?
            }
        };
        let sub_tables: usize = self.sub_tables.len();
        self.sub_tables[loc.sub_table]
            .value_mut(loc.index)
            .ok_or(ElasticError::InvariantViolation { sub_tables })
    }

    /// Looks the freshly placed key up again from scratch.
    fn resolve_placed(&self, placed: SlotLocation) -> Result<SlotLocation> {
        let resolved: Option<SlotLocation> = match self.sub_tables[placed.sub_table].slot(placed.index) {
            Slot::Occupied { key, .. } => self.locate(key),
            Slot::Empty => None,
        };
        if resolved == Some(placed) {
            return Ok(placed);
        }
        error!(?placed, ?resolved, "inserted entry is not reachable by lookup");
        Err(ElasticError::InvariantViolation {
            sub_tables: self.sub_tables.len(),
        })
    }

    /// Checks every stored entry: it must lie within the probe bound of its
    /// base index with no empty slot in between, a full lookup must resolve
    /// to exactly that slot, and the counters must agree with the slots.
    pub fn validate(&self) -> Result<()> {
        let limit: usize = self.config.probe_limit;
        let mut total: usize = 0;
        for (sub_table, sub) in self.sub_tables.iter().enumerate() {
            let mut occupied: usize = 0;
            for (index, key) in sub.iter() {
                occupied += 1;
                let hash: u64 = self.hash(key);
                let base: usize = sub.base(hash);
                let here: SlotLocation = SlotLocation { sub_table, index };
                if sub.displacement(base, index) >= limit.min(sub.capacity())
                    || !sub.chain_is_contiguous(base, index)
                    || self.locate_hashed(hash, key) != Some(here)
                {
                    error!(?here, base, "entry not reachable along its probe chain");
                    return Err(ElasticError::InvariantViolation {
                        sub_tables: self.sub_tables.len(),
                    });
                }
            }
            if occupied != sub.occupied() {
                error!(sub_table, occupied, counted = sub.occupied(), "occupied counter out of sync");
                return Err(ElasticError::InvariantViolation {
                    sub_tables: self.sub_tables.len(),
                });
            }
            total += occupied;
        }
        if total != self.len {
            error!(total, len = self.len, "length out of sync");
            return Err(ElasticError::InvariantViolation {
                sub_tables: self.sub_tables.len(),
            });
        }
        Ok(())
    }
}
