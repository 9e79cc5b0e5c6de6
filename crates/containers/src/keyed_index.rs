//! Integer-keyed associative container with insertion-order enumeration.
//!
//! `KeyedIndex` is a chained hash table: a bucket array of chain heads
//! pointing into an entry arena, with vacated slots recycled through a free
//! list. A parallel key-order array records insertion order so that `keys`
//! can enumerate deterministically. Capacity grows along a fixed prime
//! ladder once the load factor passes 0.75.

/// Keys usable in a [`KeyedIndex`].
///
/// The hash value may be negative (string-derived keys hash with wrapping
/// 32-bit arithmetic), so bucket placement floor-mods it back into range.
pub trait IndexKey: Copy + Eq {
    fn hash_value(&self) -> i64;
}

impl IndexKey for i32 {
    fn hash_value(&self) -> i64 {
        *self as i64
    }
}

impl IndexKey for i64 {
    fn hash_value(&self) -> i64 {
        *self
    }
}

impl IndexKey for u32 {
    fn hash_value(&self) -> i64 {
        *self as i64
    }
}

/// Rolling 31-based string hash over UTF-16 code units.
///
/// Production-country codes are keyed by the hash of their two-character
/// ISO 3166 code rather than by a numeric id, so the hash must be a stable
/// function of the string alone. The result can be negative for longer
/// inputs; [`KeyedIndex`] normalises that at bucket-placement time.
pub fn string_hash_key(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

const INITIAL_CAPACITY: usize = 257;
const LOAD_FACTOR: f64 = 0.75;

/// Ascending capacity ladder. Resize picks the first entry >= 2x the current
/// capacity; past the last entry capacity stops growing.
const PRIMES: [usize; 13] = [
    31, 61, 127, 257, 509, 1021, 2053, 4093, 8191, 16381, 32749, 65521, 131059,
];

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<usize>,
}

/// Hash index over integer-like keys, preserving insertion order.
#[derive(Debug, Clone)]
pub struct KeyedIndex<K: IndexKey, V> {
    /// Chain head per bucket, indexing into `entries`.
    buckets: Vec<Option<usize>>,
    /// Entry arena; vacated slots are `None` and tracked in `free`.
    entries: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    /// Live keys in insertion order.
    order: Vec<K>,
    size: usize,
}

impl<K: IndexKey, V> KeyedIndex<K, V> {
    pub fn new() -> Self {
        Self {
            buckets: vec![None; INITIAL_CAPACITY],
            entries: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            size: 0,
        }
    }

    fn bucket_index(&self, key: K) -> usize {
        key.hash_value().rem_euclid(self.buckets.len() as i64) as usize
    }

    /// Walks the bucket chain for `key` and returns its arena slot.
    fn find_slot(&self, key: K) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_index(key)];
        while let Some(idx) = cursor {
            let entry = self.entries[idx].as_ref()?;
            if entry.key == key {
                return Some(idx);
            }
            cursor = entry.next;
        }
        None
    }

    /// Looks up the value for `key`. O(1) average.
    pub fn get(&self, key: K) -> Option<&V> {
        let slot = self.find_slot(key)?;
        self.entries[slot].as_ref().map(|e| &e.value)
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let slot = self.find_slot(key)?;
        self.entries[slot].as_mut().map(|e| &mut e.value)
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns `true` for a fresh insertion and `false` when an existing
    /// value was overwritten. The key-order array and size only change on a
    /// fresh insertion. Resizes first when the load factor exceeds 0.75.
    pub fn put(&mut self, key: K, value: V) -> bool {
        if self.size as f64 / self.buckets.len() as f64 > LOAD_FACTOR {
            self.resize();
        }

        if let Some(slot) = self.find_slot(key) {
            if let Some(entry) = self.entries[slot].as_mut() {
                entry.value = value;
            }
            return false;
        }

        let bucket = self.bucket_index(key);
        let entry = Entry {
            key,
            value,
            next: self.buckets[bucket],
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.entries[slot] = Some(entry);
                slot
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        };
        self.buckets[bucket] = Some(slot);
        self.order.push(key);
        self.size += 1;
        true
    }

    /// Removes `key`, splicing its entry out of the chain and shifting the
    /// key-order array left over the gap. Returns `false` if absent.
    pub fn remove(&mut self, key: K) -> bool {
        let bucket = self.bucket_index(key);
        let mut prev: Option<usize> = None;
        let mut cursor = self.buckets[bucket];
        let mut found: Option<(Option<usize>, usize)> = None;
        while let Some(idx) = cursor {
            let Some(entry) = self.entries[idx].as_ref() else {
                break;
            };
            if entry.key == key {
                found = Some((prev, idx));
                break;
            }
            prev = Some(idx);
            cursor = entry.next;
        }

        let Some((prev, idx)) = found else {
            return false;
        };
        let next = self.entries[idx].as_ref().and_then(|e| e.next);
        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = self.entries[prev_idx].as_mut() {
                    prev_entry.next = next;
                }
            }
            None => self.buckets[bucket] = next,
        }
        self.entries[idx] = None;
        self.free.push(idx);
        self.size -= 1;
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
        }
        true
    }

    /// Linear scan of the key-order array. O(n) by design: the order array
    /// is the authority on membership, not the bucket chains.
    pub fn contains_key(&self, key: K) -> bool {
        self.order.iter().any(|k| *k == key)
    }

    /// Fresh copy of the live keys in insertion order.
    ///
    /// Filters through `get` so a stale order entry can never leak out.
    pub fn keys(&self) -> Vec<K> {
        self.order
            .iter()
            .copied()
            .filter(|k| self.get(*k).is_some())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Grows the bucket array to the next ladder prime >= 2x the current
    /// capacity and rehashes every live entry. At the top of the ladder the
    /// capacity stalls and the table simply runs denser.
    fn resize(&mut self) {
        let old_capacity = self.buckets.len();
        let target = old_capacity * 2;
        let new_capacity = PRIMES
            .iter()
            .copied()
            .find(|p| *p >= target)
            .unwrap_or(PRIMES[PRIMES.len() - 1]);
        if new_capacity == old_capacity {
            return;
        }
        tracing::debug!(old_capacity, new_capacity, size = self.size, "resizing keyed index");

        self.buckets = vec![None; new_capacity];
        for idx in 0..self.entries.len() {
            let Some(entry) = self.entries[idx].as_ref() else {
                continue;
            };
            let bucket = self.bucket_index(entry.key);
            if let Some(entry) = self.entries[idx].as_mut() {
                entry.next = self.buckets[bucket];
            }
            self.buckets[bucket] = Some(idx);
        }
        self.order.reserve(new_capacity.saturating_sub(self.order.len()));
    }
}

impl<K: IndexKey, V> Default for KeyedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
