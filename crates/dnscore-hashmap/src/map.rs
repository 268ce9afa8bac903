//! The public hashmap type: amortized two-table rehashing on top of
//! [`Table`]'s single-array Robin Hood operations.

use crate::error::{HashMapError, MAX_KEY_LEN};
use crate::hash::{EntropySource, HashSeed, KeyMode};
use crate::table::Table;

const MIN_BITS: u32 = 1;
const MAX_BITS: u32 = 32;
/// Above this load factor, growth starts on the next mutating call.
const GROW_LOAD_FACTOR: f64 = 0.9;
/// Below this load factor (and above the minimum size), shrink starts.
const SHRINK_LOAD_FACTOR: f64 = 0.2;
/// Target load factor a grow's new capacity is sized against.
const GROW_TARGET_LOAD_FACTOR: f64 = 0.4;
/// Slots migrated per mutating call while a resize is in progress. Small
/// and fixed, so no single `add`/`delete` ever pays for a whole rehash.
const MIGRATE_BATCH: usize = 2;

enum State<'k, V> {
    Steady(Table<'k, V>),
    Rehashing {
        old: Table<'k, V>,
        new: Table<'k, V>,
        cursor: usize,
    },
}

/// A Robin Hood hash table keyed by borrowed byte strings, with
/// incremental (non-stop-the-world) growth and shrink.
///
/// `V` is an opaque caller-owned value; the map never inspects it beyond
/// moving it around. Keys borrow from the caller for the map's lifetime
/// `'k` — there is no owned-key mode, so the caller's storage (e.g. a
/// name's canonical buffer) must outlive the map.
pub struct HashMap<'k, V> {
    mode: KeyMode,
    seed: HashSeed,
    state: State<'k, V>,
    len: usize,
}

impl<'k, V> HashMap<'k, V> {
    /// Creates an empty map of `2^bits` slots, seeded from `entropy` and
    /// comparing keys per `mode`. `bits` must be in `1..=32`.
    pub fn create(bits: u32, mode: KeyMode, entropy: &impl EntropySource) -> Self {
        assert!((MIN_BITS..=MAX_BITS).contains(&bits), "bits out of range: {bits}");
        Self {
            mode,
            seed: HashSeed::from_entropy(entropy),
            state: State::Steady(Table::with_bits(bits)),
            len: 0,
        }
    }

    /// Creates an empty map with an explicit seed, for reproducible tests
    /// and differential fuzzing.
    pub fn create_seeded(bits: u32, mode: KeyMode, seed_bytes: [u8; 16]) -> Self {
        assert!((MIN_BITS..=MAX_BITS).contains(&bits), "bits out of range: {bits}");
        Self {
            mode,
            seed: HashSeed::new(seed_bytes),
            state: State::Steady(Table::with_bits(bits)),
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn count(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn hash_of(&self, key: &[u8]) -> u32 {
        self.seed.hash(key, self.mode)
    }

    fn check_key(key: &[u8]) -> Result<(), HashMapError> {
        if key.len() > MAX_KEY_LEN {
            Err(HashMapError::KeyTooLong(key.len()))
        } else {
            Ok(())
        }
    }

    pub fn find(&self, key: &[u8]) -> Option<&V> {
        let hash = self.hash_of(key);
        match &self.state {
            State::Steady(table) => table.find(hash, key, self.mode),
            State::Rehashing { old, new, .. } => new
                .find(hash, key, self.mode)
                .or_else(|| old.find(hash, key, self.mode)),
        }
    }

    /// As [`find`](Self::find), but yields a mutable reference so a
    /// caller can update a value in place instead of delete-then-add.
    pub fn find_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let hash = self.hash_of(key);
        match &mut self.state {
            State::Steady(table) => table.find_mut(hash, key, self.mode),
            State::Rehashing { old, new, .. } => {
                if new.find(hash, key, self.mode).is_some() {
                    new.find_mut(hash, key, self.mode)
                } else {
                    old.find_mut(hash, key, self.mode)
                }
            }
        }
    }

    /// Inserts `key`/`value`. Returns [`HashMapError::KeyTooLong`] if the
    /// key exceeds the wire length limit, and leaves an existing entry for
    /// the same key untouched (callers distinguish "already present" from
    /// genuine insertion by calling `find` first, matching the reference
    /// EXISTS/OK split).
    pub fn add(&mut self, key: &'k [u8], value: V) -> Result<bool, HashMapError> {
        Self::check_key(key)?;
        self.migrate_step();
        let hash = self.hash_of(key);
        let inserted = match &mut self.state {
            State::Steady(table) => table.insert(hash, key, value, self.mode).is_ok(),
            State::Rehashing { new, old, .. } => {
                if old.find(hash, key, self.mode).is_some() {
                    false
                } else {
                    new.insert(hash, key, value, self.mode).is_ok()
                }
            }
        };
        if inserted {
            self.len += 1;
        }
        self.maybe_start_resize();
        Ok(inserted)
    }

    /// Removes the entry for `key`, returning its value if present.
    pub fn delete(&mut self, key: &[u8]) -> Option<V> {
        self.migrate_step();
        let hash = self.hash_of(key);
        let removed = match &mut self.state {
            State::Steady(table) => table.remove(hash, key, self.mode),
            State::Rehashing { old, new, .. } => new
                .remove(hash, key, self.mode)
                .or_else(|| old.remove(hash, key, self.mode)),
        };
        if removed.is_some() {
            self.len -= 1;
        }
        self.maybe_start_resize();
        removed.map(|node| node.value)
    }

    /// Moves up to [`MIGRATE_BATCH`] entries from the old table into the
    /// new one, finishing the resize once the old table is drained.
    fn migrate_step(&mut self) {
        let State::Rehashing { old, new, cursor } = &mut self.state else {
            return;
        };
        let mut moved = 0;
        while moved < MIGRATE_BATCH {
            let Some(pos) = old.first_occupied_from(*cursor) else {
                break;
            };
            let node = old.remove_at(pos).expect("slot located by first_occupied_from");
            new.insert_node(node);
            *cursor = pos + 1;
            moved += 1;
        }
        if old.first_occupied_from(*cursor).is_none() {
            let State::Rehashing { new, .. } = std::mem::replace(
                &mut self.state,
                State::Steady(Table::with_bits(MIN_BITS)),
            ) else {
                unreachable!()
            };
            self.state = State::Steady(new);
        }
    }

    fn maybe_start_resize(&mut self) {
        let State::Steady(_) = &self.state else {
            return;
        };
        let State::Steady(table) = std::mem::replace(
            &mut self.state,
            State::Steady(Table::with_bits(MIN_BITS)),
        ) else {
            unreachable!()
        };
        let capacity = table.capacity();
        let load = self.len as f64 / capacity as f64;
        let bits = table.bits();
        if load > GROW_LOAD_FACTOR {
            self.state = State::Rehashing {
                new: Table::with_bits(self.grow_target_bits(bits)),
                old: table,
                cursor: 0,
            };
        } else if load < SHRINK_LOAD_FACTOR && bits > MIN_BITS {
            self.state = State::Rehashing {
                new: Table::with_bits((bits - 1).max(MIN_BITS)),
                old: table,
                cursor: 0,
            };
        } else {
            self.state = State::Steady(table);
        }
    }

    /// Smallest `b' > b` such that `count <= 40% * 2^b'`, capped at 32.
    fn grow_target_bits(&self, bits: u32) -> u32 {
        let mut candidate = bits + 1;
        while candidate < MAX_BITS && self.len as f64 > GROW_TARGET_LOAD_FACTOR * (1u64 << candidate) as f64 {
            candidate += 1;
        }
        candidate
    }

    /// `true` while an incremental resize is in progress.
    pub fn is_rehashing(&self) -> bool {
        matches!(self.state, State::Rehashing { .. })
    }

    /// Runs [`migrate_step`](Self::migrate_step) to completion. Used by
    /// [`crate::iter::Cursor`], which needs a single stable table to walk.
    pub(crate) fn finish_resize_fully(&mut self) {
        while self.is_rehashing() {
            self.migrate_step();
        }
    }

    pub(crate) fn steady_table_mut(&mut self) -> &mut Table<'k, V> {
        match &mut self.state {
            State::Steady(table) => table,
            State::Rehashing { .. } => unreachable!("finish_resize_fully leaves state Steady"),
        }
    }

    /// Opens a cursor for stateful, delete-safe iteration.
    pub fn cursor(&mut self) -> crate::iter::Cursor<'_, 'k, V> {
        crate::iter::Cursor::new(self)
    }

    /// A point-in-time snapshot for metrics, beyond what the spec's own
    /// `count` operation exposes. Not part of §4.1's operation list —
    /// a production vendor of this crate wants load-factor and
    /// in-progress-resize visibility without reaching into internals.
    pub fn stats(&self) -> Stats {
        let (capacity, is_rehashing) = match &self.state {
            State::Steady(table) => (table.capacity(), false),
            State::Rehashing { new, .. } => (new.capacity(), true),
        };
        Stats {
            len: self.len,
            capacity,
            is_rehashing,
            load_factor: self.len as f64 / capacity as f64,
        }
    }

    /// Iterates all live entries in unspecified order. Stable across a
    /// call that performs no mutation in between.
    pub fn iter(&self) -> impl Iterator<Item = (&'k [u8], &V)> {
        match &self.state {
            State::Steady(table) => Either::Left(table.iter_live()),
            State::Rehashing { old, new, .. } => Either::Right(old.iter_live().chain(new.iter_live())),
        }
    }
}

/// Point-in-time metrics snapshot returned by [`HashMap::stats`].
///
/// `capacity`/`load_factor` describe the table new insertions land in
/// (the active/target table while a resize is in progress), not the
/// source table being drained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub len: usize,
    pub capacity: usize,
    pub is_rehashing: bool,
    pub load_factor: f64,
}

/// Minimal two-way iterator union so `iter()` can return one concrete
/// type without boxing, without pulling in a crate for it.
enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R, T> Iterator for Either<L, R>
where
    L: Iterator<Item = T>,
    R: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Either::Left(l) => l.next(),
            Either::Right(r) => r.next(),
        }
    }
}

impl<'a, 'k, V> IntoIterator for &'a HashMap<'k, V> {
    type Item = (&'k [u8], &'a V);
    type IntoIter = Box<dyn Iterator<Item = (&'k [u8], &'a V)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
