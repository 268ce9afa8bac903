#![no_main]
use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use dnscore_hashmap::{HashMap, KeyMode};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Add { key: u8, value: u32 },
    Delete { key: u8 },
    Find { key: u8 },
}

/// Differential fuzzer against a `BTreeMap` oracle (§8 invariant 6: an
/// incremental resize must preserve membership; invariant 1: `count`
/// tracks the live-key multiset size exactly). Keys are drawn from a
/// one-byte alphabet so collisions and backward-shift deletes are
/// exercised densely despite the small input space.
fuzz_target!(|ops: Vec<Op>| {
    let mut map: HashMap<'static, u32> = HashMap::create_seeded(1, KeyMode::Exact, [0u8; 16]);
    let mut oracle: BTreeMap<u8, u32> = BTreeMap::new();
    let mut keys: Vec<&'static [u8]> = Vec::new();

    for op in ops {
        match op {
            Op::Add { key, value } => {
                let present = oracle.contains_key(&key);
                let key_bytes: &'static [u8] = Box::leak(Box::new([key]));
                keys.push(key_bytes);
                let inserted = map.add(key_bytes, value).unwrap();
                assert_eq!(inserted, !present, "add result disagrees with oracle presence");
                oracle.entry(key).or_insert(value);
            }
            Op::Delete { key } => {
                let expected = oracle.remove(&key);
                let removed = map.delete(&[key]);
                assert_eq!(removed, expected, "delete result disagrees with oracle");
            }
            Op::Find { key } => {
                let expected = oracle.get(&key).copied();
                assert_eq!(map.find(&[key]).copied(), expected, "find result disagrees with oracle");
            }
        }
        assert_eq!(map.count(), oracle.len(), "count drifted from the oracle's live-key count");
    }

    for (&k, &v) in oracle.iter() {
        assert_eq!(map.find(&[k]), Some(&v));
    }
    let _ = keys;
});
