//! Ephemeral identity generator (§4.4).
//!
//! Synthesizes a throwaway P-256 key pair and self-signed certificate for
//! servers started without on-disk material. The certificate authenticates
//! nothing by itself; it exists because the TLS handshake requires one.

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::x509::{X509, X509NameBuilder};

use crate::error::TlsError;

/// Free variable from §4.4's subject template
/// (`C=AQ, O=<product> ephemeral certificate, CN=<product>.local`).
/// Left as a constant rather than hardcoded so a vendoring server can
/// rebuild under a different product name without patching this crate.
pub const EPHEMERAL_CERT_PRODUCT: &str = "dnscore";

const VALIDITY_DAYS: u32 = 365 * 10;
const X509_VERSION_V1: i32 = 0;

/// Generates a P-256 key pair and a self-signed X.509 v1 certificate
/// (serial 1, 10-year validity, SHA-256 self-signature) for `product`.
pub fn generate_ephemeral_identity(product: &str) -> Result<(X509, PKey<Private>), TlsError> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)?;
    let ec_key = EcKey::generate(&group)?;
    let pkey = PKey::from_ec_key(ec_key)?;

    let mut name = X509NameBuilder::new()?;
    name.append_entry_by_text("C", "AQ")?;
    name.append_entry_by_text("O", &format!("{product} ephemeral certificate"))?;
    name.append_entry_by_text("CN", &format!("{product}.local"))?;
    let name = name.build();

    let mut builder = X509::builder()?;
    builder.set_version(X509_VERSION_V1)?;
    builder.set_serial_number(&BigNum::from_u32(1)?.to_asn1_integer()?)?;
    builder.set_subject_name(&name)?;
    builder.set_issuer_name(&name)?;
    builder.set_not_before(&Asn1Time::days_from_now(0)?)?;
    builder.set_not_after(&Asn1Time::days_from_now(VALIDITY_DAYS)?)?;
    builder.set_pubkey(&pkey)?;
    builder.sign(&pkey, MessageDigest::sha256())?;
    let cert = builder.build();

    Ok((cert, pkey))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S6 (EIG): subject CN, serial, and validity window match §4.4/§6.
    #[test]
    fn s6_generated_identity_matches_shape() {
        let (cert, _pkey) = generate_ephemeral_identity(EPHEMERAL_CERT_PRODUCT).unwrap();

        let subject = cert.subject_name();
        let cn = subject
            .entries_by_nid(Nid::COMMONNAME)
            .next()
            .unwrap()
            .data()
            .as_utf8()
            .unwrap()
            .to_string();
        assert_eq!(cn, format!("{EPHEMERAL_CERT_PRODUCT}.local"));

        let serial = cert.serial_number().to_bn().unwrap();
        assert_eq!(serial, BigNum::from_u32(1).unwrap());

        let nine_years = Asn1Time::days_from_now(365 * 9).unwrap();
        assert_eq!(
            cert.not_after().compare(&nine_years).unwrap(),
            std::cmp::Ordering::Greater
        );
    }
}
