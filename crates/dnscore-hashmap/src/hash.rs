//! Keyed 32-bit hashing over byte-string keys.
//!
//! Uses half-SipHash-2-4 (SipHash-2-4 truncated by XOR-folding the 64-bit
//! digest) seeded from 16 bytes of map-instance entropy. Folding ASCII
//! before hashing is what lets a case-insensitive map share one hash value
//! across casefold-equal keys.

use siphasher::sip::SipHasher24;
use std::hash::Hasher;

/// Whether key comparison (and hashing) folds ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Exact byte-for-byte equality.
    Exact,
    /// ASCII case-insensitive equality (non-ASCII bytes compared exactly).
    AsciiCaseInsensitive,
}

impl KeyMode {
    pub(crate) fn eq(self, a: &[u8], b: &[u8]) -> bool {
        match self {
            KeyMode::Exact => a == b,
            KeyMode::AsciiCaseInsensitive => a.eq_ignore_ascii_case(b),
        }
    }
}

/// Supplies entropy for seeding a map's keyed hash function.
///
/// Mirrors the "entropy source (fill N random bytes)" collaborator the
/// core depends on rather than owns.
pub trait EntropySource {
    fn fill(&self, out: &mut [u8]);
}

/// Production entropy source backed by the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, out: &mut [u8]) {
        use rand::RngCore;
        rand::rngs::OsRng.fill_bytes(out);
    }
}

/// Deterministic all-zero entropy source.
///
/// Permitted only in fuzz/test builds (§4.1): a map seeded this way is
/// fully reproducible, which is what differential fuzzing against a
/// reference model needs and what production code must never do.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroEntropy;

impl EntropySource for ZeroEntropy {
    fn fill(&self, out: &mut [u8]) {
        out.fill(0);
    }
}

/// 16 bytes of keyed-hash seed, split into the two 64-bit SipHash keys.
#[derive(Clone, Copy)]
pub(crate) struct HashSeed([u8; 16]);

impl HashSeed {
    pub(crate) fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub(crate) fn from_entropy(source: &impl EntropySource) -> Self {
        let mut bytes = [0u8; 16];
        source.fill(&mut bytes);
        Self(bytes)
    }

    fn keys(&self) -> (u64, u64) {
        let k0 = u64::from_le_bytes(self.0[0..8].try_into().unwrap());
        let k1 = u64::from_le_bytes(self.0[8..16].try_into().unwrap());
        (k0, k1)
    }

    /// Computes the 32-bit keyed hash of `key`, folding ASCII case first
    /// when `mode` requires it.
    pub(crate) fn hash(&self, key: &[u8], mode: KeyMode) -> u32 {
        let (k0, k1) = self.keys();
        let mut hasher = SipHasher24::new_with_keys(k0, k1);
        match mode {
            KeyMode::Exact => hasher.write(key),
            KeyMode::AsciiCaseInsensitive => {
                for &b in key {
                    hasher.write_u8(b.to_ascii_lowercase());
                }
            }
        }
        let digest = hasher.finish();
        (digest ^ (digest >> 32)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_fold_matches() {
        let seed = HashSeed::new([7u8; 16]);
        let a = seed.hash(b"Foo", KeyMode::AsciiCaseInsensitive);
        let b = seed.hash(b"fOO", KeyMode::AsciiCaseInsensitive);
        assert_eq!(a, b);
    }

    #[test]
    fn exact_mode_is_case_sensitive() {
        let seed = HashSeed::new([7u8; 16]);
        let a = seed.hash(b"Foo", KeyMode::Exact);
        let b = seed.hash(b"fOO", KeyMode::Exact);
        assert_ne!(a, b);
    }

    #[test]
    fn deterministic_for_same_seed() {
        let seed = HashSeed::new([1u8; 16]);
        assert_eq!(
            seed.hash(b"hello", KeyMode::Exact),
            seed.hash(b"hello", KeyMode::Exact)
        );
    }
}
