//! A Robin Hood open-addressed hash table with incremental rehashing.
//!
//! This crate has no notion of names, transports, or TLS; it is a general
//! byte-string-keyed container. [`dnscore_cache`](../dnscore_cache/index.html)
//! builds the TLS context cache on top of it.
#![deny(unsafe_code)]

mod error;
mod hash;
mod iter;
mod map;
mod table;

pub use error::{HashMapError, MAX_KEY_LEN};
pub use hash::{EntropySource, KeyMode, OsEntropy, ZeroEntropy};
pub use iter::Cursor;
pub use map::{HashMap, Stats};
