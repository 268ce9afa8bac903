use thiserror::Error;

/// Provider failures (§7: "surface as `TLS_ERROR` with the provider's
/// error string logged"). Contract violations are not represented here —
/// they panic, per the spec's "abort the process" taxonomy.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("tls provider: {0}")]
    Provider(#[from] openssl::error::ErrorStack),
    #[error("reading PEM material: {0}")]
    Io(#[from] std::io::Error),
    #[error("cipher list rejected by provider: {0}")]
    InvalidCipherList(String),
}
