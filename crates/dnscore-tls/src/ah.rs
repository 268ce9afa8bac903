//! ALPN/NPN protocol negotiation helpers (§4.6).

use openssl::error::ErrorStack;
use openssl::ssl::{AlpnError, SslContextBuilder, SslRef};

pub const H2: &[u8] = b"h2";
pub const DOT: &[u8] = b"dot";

fn wire_encode(label: &'static [u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + label.len());
    out.push(label.len() as u8);
    out.extend_from_slice(label);
    out
}

/// Scans a wire-format protocol list (`(len: u8, bytes)*`) for `label`,
/// returning its payload if present. O(n) in the list's length (§4.6).
pub fn scan_alpn_wire<'a>(list: &'a [u8], label: &[u8]) -> Option<&'a [u8]> {
    let mut i = 0;
    while i < list.len() {
        let len = list[i] as usize;
        let end = i.checked_add(1)?.checked_add(len)?;
        if end > list.len() {
            return None;
        }
        let record = &list[i + 1..end];
        if record == label {
            return Some(record);
        }
        i = end;
    }
    None
}

/// Client HTTP/2: advertise `"h2"` via ALPN, and since NPN negotiation
/// hands the *client* the choice, install an NPN selector that picks
/// `"h2"` whenever the server offers it.
pub fn install_client_h2(builder: &mut SslContextBuilder) -> Result<(), ErrorStack> {
    builder.set_alpn_protos(&wire_encode(H2))?;
    builder.set_npn_select_callback(|_: &mut SslRef, offered: &[u8]| {
        scan_alpn_wire(offered, H2).ok_or(AlpnError::NOACK)
    });
    Ok(())
}

/// Server HTTP/2: advertise `"h2"` via NPN (the server side of that
/// negotiation just offers), and install the ALPN selector that picks it.
pub fn install_server_h2(builder: &mut SslContextBuilder) -> Result<(), ErrorStack> {
    builder.set_npn_protos(&wire_encode(H2))?;
    builder.set_alpn_select_callback(|_: &mut SslRef, offered: &[u8]| {
        scan_alpn_wire(offered, H2).ok_or(AlpnError::NOACK)
    });
    Ok(())
}

/// Client DoT: advertise only `"dot"` via ALPN.
pub fn install_client_dot(builder: &mut SslContextBuilder) -> Result<(), ErrorStack> {
    builder.set_alpn_protos(&wire_encode(DOT))?;
    Ok(())
}

/// Server DoT: install an ALPN selector that picks `"dot"` from whatever
/// the client offered.
pub fn install_server_dot(builder: &mut SslContextBuilder) -> Result<(), ErrorStack> {
    builder.set_alpn_select_callback(|_: &mut SslRef, offered: &[u8]| {
        scan_alpn_wire(offered, DOT).ok_or(AlpnError::NOACK)
    });
    Ok(())
}

/// Returns the negotiated protocol for a connection: NPN's choice if any,
/// else ALPN's.
pub fn get_selected_alpn<'a>(ssl: &'a SslRef) -> Option<&'a [u8]> {
    ssl.selected_npn_protocol().or_else(|| ssl.selected_alpn_protocol())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(labels: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for l in labels {
            out.push(l.len() as u8);
            out.extend_from_slice(l);
        }
        out
    }

    #[test]
    fn scan_finds_present_record() {
        let list = wire(&[b"dot", b"h2"]);
        assert_eq!(scan_alpn_wire(&list, b"h2"), Some(b"h2".as_slice()));
        assert_eq!(scan_alpn_wire(&list, b"dot"), Some(b"dot".as_slice()));
    }

    #[test]
    fn scan_misses_absent_record() {
        let list = wire(&[b"h2"]);
        assert_eq!(scan_alpn_wire(&list, b"dot"), None);
    }

    #[test]
    fn scan_rejects_truncated_list() {
        let mut list = wire(&[b"dot"]);
        list.truncate(list.len() - 1);
        assert_eq!(scan_alpn_wire(&list, b"dot"), None);
    }
}
