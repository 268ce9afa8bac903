//! Reference-counted, rwlock-guarded TLS context cache (CC) keyed by
//! logical name and `(transport, family)`, built atop
//! [`dnscore_hashmap`]'s Robin Hood hashmap.

mod cache;
mod error;
mod matrix;

pub use cache::{AddResult, Cache};
pub use error::CacheError;
pub use matrix::{Family, Transport};
