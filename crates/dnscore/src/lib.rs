//! `dnscore`: the facade crate over the TLS context infrastructure.
//!
//! Mirrors the teacher's core/abi/facade split: [`dnscore_hashmap`] and
//! [`dnscore_tls`] are the two hard cores (§2 of the spec), [`dnscore_cache`]
//! is the glue that sits atop the hashmap and publishes TLS contexts built
//! by the TLS crate, and this crate re-exports the combined public surface
//! a host DNS server actually links against.

pub use dnscore_cache::{AddResult, Cache, CacheError, Family, Transport};
pub use dnscore_hashmap::{EntropySource, HashMap, HashMapError, KeyMode, OsEntropy, ZeroEntropy};
pub use dnscore_tls::{
    ah, cb, eig, logger, pi, AlpnRole, CbConfig, Level, Logger, NullLogger, ProtocolMask, TlsContext,
    TlsError, TracingLogger,
};

/// A TLS context cache keyed by logical name, holding [`TlsContext`]s
/// behind an `Arc` so `CC::find` can hand out a cheap clone to readers
/// (§4.5: "cached context pointers themselves are immutable once
/// published").
pub type TlsContextCache<'k> = Cache<'k, std::sync::Arc<TlsContext>>;
