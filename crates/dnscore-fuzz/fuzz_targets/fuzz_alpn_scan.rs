#![no_main]
use dnscore_tls::ah::scan_alpn_wire;
use libfuzzer_sys::fuzz_target;

/// §4.6's ALPN scan must never panic or read out of bounds on an
/// attacker-controlled wire-format list, including truncated length
/// prefixes at the end of the buffer.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let (needle_len, rest) = data.split_at(1);
    let needle_len = (needle_len[0] as usize).min(rest.len());
    let needle = &rest[..needle_len];
    let list = &rest[needle_len..];

    match scan_alpn_wire(list, needle) {
        Some(found) => assert_eq!(found, needle, "scan returned a record that doesn't match the needle"),
        None => {}
    }
});
