//! Fixed-size open-addressed segment and the bounded linear prober.

use std::borrow::Borrow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<K, V> {
    Empty,
    Occupied { key: K, value: V },
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Outcome of one bounded scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The key sits at this index.
    Found(usize),
    /// First empty slot on the chain; the key is not in this sub-table.
    Vacant(usize),
    /// The probe bound ran out on occupied slots.
    Exhausted,
}

#[derive(Debug)]
pub struct SubTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    occupied: usize,
}

impl<K, V> SubTable<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            occupied: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Index where the probe chain for `hash` starts.
    #[inline]
    pub fn base(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    /// Whether the fill ratio is strictly below `max_fill_percent`.
    /// With 90 this is `occupied * 10 < capacity * 9`.
    #[inline]
    pub fn is_eligible(&self, max_fill_percent: usize) -> bool {
        self.occupied.saturating_mul(100) < self.capacity().saturating_mul(max_fill_percent)
    }

    /// Scans at most `min(limit, capacity)` slots starting at the base index,
    /// wrapping around. Stops at the first matching key or the first empty slot.
    pub fn probe<Q>(&self, hash: u64, key: &Q, limit: usize) -> Probe
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let capacity: usize = self.capacity();
        let base: usize = self.base(hash);
        let probes: usize = limit.min(capacity);
        let mut step: usize = 0;
        while step < probes {
            let index: usize = (base + step) % capacity;
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(index),
                Slot::Occupied { key: k, .. } if k.borrow() == key => return Probe::Found(index),
                Slot::Occupied { .. } => {}
            }
            step += 1;
        }
        Probe::Exhausted
    }

    /// The one Empty -> Occupied transition a slot ever makes.
    pub fn place(&mut self, index: usize, key: K, value: V) {
        debug_assert!(self.slots[index].is_empty());
        self.slots[index] = Slot::Occupied { key, value };
        self.occupied += 1;
    }

    #[inline]
    pub fn slot(&self, index: usize) -> &Slot<K, V> {
        &self.slots[index]
    }

    pub fn value(&self, index: usize) -> Option<&V> {
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty => None,
        }
    }

    pub fn value_mut(&mut self, index: usize) -> Option<&mut V> {
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty => None,
        }
    }

    /// Every slot from `base` up to and including `index` (wrapping) is occupied.
    /// Lookups stop at the first empty slot, so an entry behind a gap is lost.
    pub fn chain_is_contiguous(&self, base: usize, index: usize) -> bool {
        let capacity: usize = self.capacity();
        let distance: usize = (index + capacity - base) % capacity;
        (0..=distance).all(|step| !self.slots[(base + step) % capacity].is_empty())
    }

    /// Distance of `index` from `base` along the probe chain.
    #[inline]
    pub fn displacement(&self, base: usize, index: usize) -> usize {
        (index + self.capacity() - base) % self.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &K)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { key, .. } => Some((index, key)),
                Slot::Empty => None,
            })
    }
}
