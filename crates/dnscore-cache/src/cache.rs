//! The TLS context cache (§4.5): a reference-counted, rwlock-guarded map
//! of logical name to a `(transport, family)` matrix of contexts, built
//! atop [`dnscore_hashmap::HashMap`].

use std::sync::Arc;

use dnscore_hashmap::{HashMap, KeyMode, OsEntropy};
use parking_lot::RwLock;

use crate::error::CacheError;
use crate::matrix::{Family, Transport};

struct CacheEntry<V> {
    matrix: [[Option<V>; 2]; Transport::COUNT],
}

impl<V> CacheEntry<V> {
    fn empty() -> Self {
        Self {
            matrix: Default::default(),
        }
    }
}

/// Outcome of [`Cache::add`]. `Inserted` covers both "no entry for this
/// name yet" and "the entry existed but this `(transport, family)` slot
/// was empty" — the Open Question in the spec's Design Notes pins
/// `Exists` to firing *only* when the slot itself was already occupied.
pub enum AddResult<V> {
    Inserted,
    Exists { existing: V, rejected: V },
}

/// Reference-counted via `Arc<Cache>`: `attach` is `Arc::clone`, `detach`
/// is dropping the handle, and the last drop frees every contained
/// context along with the `Arc`'s own allocation (§4.5 "last detach
/// destroys all entries").
pub struct Cache<'k, V> {
    names: RwLock<HashMap<'k, CacheEntry<V>>>,
}

impl<'k, V: Clone> Cache<'k, V> {
    /// `new(allocator) -> cache` (§4.5): Rust has no separate allocator
    /// collaborator to thread through, so construction takes none.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            names: RwLock::new(HashMap::create(4, KeyMode::Exact, &OsEntropy)),
        })
    }

    /// Bumps the refcount; `Arc::clone` already does exactly what §4.5
    /// describes.
    pub fn attach(this: &Arc<Self>) -> Arc<Self> {
        Arc::clone(this)
    }

    /// Decrements the refcount. The last drop frees every context, since
    /// `CacheEntry`'s `Option<V>` slots simply drop `V` along with it.
    pub fn detach(this: Arc<Self>) {
        drop(this);
    }

    fn check_name(name: &[u8]) -> Result<(), CacheError> {
        if name.is_empty() || name.contains(&0) {
            Err(CacheError::InvalidName)
        } else {
            Ok(())
        }
    }

    /// Publishes `ctx` under `(name, transport, family)`. Installs it if
    /// that slot was empty (creating the name's entry first if needed);
    /// otherwise returns the slot's existing context plus `ctx` handed
    /// back unclaimed, so the caller can adopt the winner and drop its
    /// own redundant build.
    pub fn add(
        &self,
        name: &'k [u8],
        transport: Transport,
        family: Family,
        ctx: V,
    ) -> Result<AddResult<V>, CacheError> {
        Self::check_name(name)?;
        let mut names = self.names.write();
        if names.find(name).is_none() {
            names.add(name, CacheEntry::empty()).expect("just checked absence under write lock");
        }
        let entry = names.find_mut(name).expect("just inserted or already present");
        let slot = &mut entry.matrix[transport.offset()][family.offset()];
        match slot {
            Some(existing) => Ok(AddResult::Exists {
                existing: existing.clone(),
                rejected: ctx,
            }),
            None => {
                *slot = Some(ctx);
                Ok(AddResult::Inserted)
            }
        }
    }

    /// Looks up the context for `(name, transport, family)` under the
    /// read lock. Multiple readers may call this concurrently (§4.5,
    /// §5).
    pub fn find(&self, name: &[u8], transport: Transport, family: Family) -> Option<V> {
        let names = self.names.read();
        let entry = names.find(name)?;
        entry.matrix[transport.offset()][family.offset()].clone()
    }

    pub fn len(&self) -> usize {
        self.names.read().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
