//! TLS context factory and cache infrastructure: process-singleton crypto
//! init (PI), context builder (CB), ephemeral identity generation (EIG),
//! and ALPN/NPN negotiation helpers (AH).

pub mod ah;
pub mod cb;
pub mod eig;
pub mod error;
pub mod logger;
pub mod pi;

pub use cb::{create_client, create_server, valid_cipherlist, AlpnRole, CbConfig, ProtocolMask, TlsContext};
pub use eig::{generate_ephemeral_identity, EPHEMERAL_CERT_PRODUCT};
pub use error::TlsError;
pub use logger::{Level, Logger, NullLogger, TracingLogger};
pub use pi::{initialize, is_initialized, shutdown, PiState};
