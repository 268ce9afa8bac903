//! TLS context builder (§4.3).
//!
//! [`TlsContext`] wraps the configuration that eventually becomes an
//! `openssl::ssl::SslContext`. The `openssl` crate only exposes mutators
//! on `SslContextBuilder`, consumed once by `build()`, while real OpenSSL
//! lets `SSL_CTX_set_options` and friends run at any time and affect only
//! connections created afterward — so `TlsContext` keeps its settings as
//! plain fields and rebuilds a fresh `SslContextBuilder` each time
//! [`new_session`](TlsContext::new_session) is called, matching that
//! "current settings apply to subsequent sessions" semantics exactly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use openssl::dh::Dh;
use openssl::pkey::{PKey, Private};
use openssl::ssl::{Ssl, SslContextBuilder, SslMethod, SslOptions, SslVersion};
use openssl::x509::X509;

use crate::ah;
use crate::eig;
use crate::error::TlsError;
use crate::logger::{Level, Logger};

/// Disable-compression, disable-resumption-on-renegotiation: applied to
/// every context regardless of role (§4.3 "COMMON_OPTIONS").
fn common_options() -> SslOptions {
    SslOptions::NO_COMPRESSION | SslOptions::NO_SESSION_RESUMPTION_ON_RENEGOTIATION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Client,
    Server,
}

/// Bitmask over the two protocol versions this crate ever negotiates.
/// Mirrors §4.3's "bitmask over `{1.2, 1.3}`" exactly rather than reusing
/// `openssl::ssl::SslOptions`' disable bits as the public type, so callers
/// state *enabled* versions instead of thinking in disable-bit terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolMask {
    pub tls1_2: bool,
    pub tls1_3: bool,
}

impl ProtocolMask {
    pub const ALL: Self = Self {
        tls1_2: true,
        tls1_3: true,
    };

    fn is_empty(self) -> bool {
        !self.tls1_2 && !self.tls1_3
    }
}

impl Default for ProtocolMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Which ALPN/NPN advertisement set, if any, a context negotiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlpnRole {
    None,
    Http2,
    Dot,
}

/// Construction parameters for [`create_client`]/[`create_server`],
/// grouped into one value instead of a long parameter list.
#[derive(Clone)]
pub struct CbConfig {
    pub cipher_list: Option<String>,
    pub protocol_mask: ProtocolMask,
    pub dhparam_path: Option<PathBuf>,
    pub prefer_server_ciphers: bool,
    pub session_tickets: bool,
    pub alpn: AlpnRole,
}

impl Default for CbConfig {
    fn default() -> Self {
        Self {
            cipher_list: None,
            protocol_mask: ProtocolMask::default(),
            dhparam_path: None,
            prefer_server_ciphers: false,
            session_tickets: true,
            alpn: AlpnRole::None,
        }
    }
}

/// A TLS configuration in progress. Mutators here correspond to the
/// spec's operations on an already-created `ctx`; [`new_session`] is the
/// point a concrete, immutable `SslContext` is finally materialized.
pub struct TlsContext {
    role: Role,
    cipher_list: Option<String>,
    protocol_mask: ProtocolMask,
    dhparams: Option<Vec<u8>>,
    prefer_server_ciphers: bool,
    session_tickets: bool,
    alpn: AlpnRole,
    identity: Option<(X509, PKey<Private>)>,
    keylog: Option<Arc<dyn Logger>>,
}

impl TlsContext {
    /// §4.3 "Protocol-version mask": the mask must not be zero, and
    /// selecting a version whose disable-bit this build lacks is a
    /// contract violation — both unreachable here since `ProtocolMask`
    /// only names the two versions `openssl`'s `SslOptions` always has.
    pub fn set_protocols(&mut self, mask: ProtocolMask) {
        assert!(!mask.is_empty(), "protocol mask must not be zero");
        self.protocol_mask = mask;
    }

    /// Reads PEM DH parameters from `path`, runs the provider's
    /// consistency check, and installs them on success.
    pub fn load_dhparams(&mut self, path: &Path) -> Result<bool, TlsError> {
        let pem = std::fs::read(path)?;
        let dh = Dh::params_from_pem(&pem)?;
        if !dh.check_key()? {
            return Ok(false);
        }
        self.dhparams = Some(pem);
        Ok(true)
    }

    pub fn set_cipherlist(&mut self, list: &str) {
        self.cipher_list = Some(list.to_string());
    }

    pub fn prefer_server_ciphers(&mut self, yes: bool) {
        self.prefer_server_ciphers = yes;
    }

    pub fn session_tickets(&mut self, yes: bool) {
        self.session_tickets = yes;
    }

    /// Spawns a per-connection TLS state object reflecting the context's
    /// *current* settings (§4.3 "Per-connection handle").
    pub fn new_session(&self) -> Result<Ssl, TlsError> {
        let ctx = self.build_context()?;
        Ok(Ssl::new(&ctx)?)
    }

    fn build_context(&self) -> Result<openssl::ssl::SslContext, TlsError> {
        // §4.3: "the mask must not be zero" is a contract violation on every
        // construction path, not just `set_protocols` — `protocol_mask` is a
        // plain `pub` field callers can also set through `CbConfig`.
        assert!(!self.protocol_mask.is_empty(), "protocol mask must not be zero");

        let method = match self.role {
            Role::Client => SslMethod::tls_client(),
            Role::Server => SslMethod::tls_server(),
        };
        let mut builder = SslContextBuilder::new(method)?;
        builder.set_options(common_options());
        builder.set_min_proto_version(Some(SslVersion::TLS1_2))?;
        apply_protocol_mask(&mut builder, self.protocol_mask);

        if let Some(list) = &self.cipher_list {
            builder
                .set_cipher_list(list)
                .map_err(|_| TlsError::InvalidCipherList(list.clone()))?;
        }

        if let Some(pem) = &self.dhparams {
            let dh = Dh::params_from_pem(pem)?;
            builder.set_tmp_dh(&dh)?;
        }

        if self.prefer_server_ciphers {
            builder.set_options(SslOptions::CIPHER_SERVER_PREFERENCE);
        }
        if !self.session_tickets {
            builder.set_options(SslOptions::NO_TICKET);
        }

        if let Some((cert, key)) = &self.identity {
            builder.set_certificate(cert)?;
            builder.set_private_key(key)?;
        }

        match (self.role, self.alpn) {
            (Role::Client, AlpnRole::Http2) => ah::install_client_h2(&mut builder)?,
            (Role::Server, AlpnRole::Http2) => ah::install_server_h2(&mut builder)?,
            (Role::Client, AlpnRole::Dot) => ah::install_client_dot(&mut builder)?,
            (Role::Server, AlpnRole::Dot) => ah::install_server_dot(&mut builder)?,
            (_, AlpnRole::None) => {}
        }

        if let Some(logger) = &self.keylog {
            let logger = Arc::clone(logger);
            builder.set_keylog_callback(move |_, line| {
                logger.event(Level::Info, "tls::keylog", line);
            });
        }

        Ok(builder.build())
    }
}

fn apply_protocol_mask(builder: &mut SslContextBuilder, mask: ProtocolMask) {
    if mask.tls1_2 {
        builder.clear_options(SslOptions::NO_TLSV1_2);
    } else {
        builder.set_options(SslOptions::NO_TLSV1_2);
    }
    if mask.tls1_3 {
        builder.clear_options(SslOptions::NO_TLSV1_3);
    } else {
        builder.set_options(SslOptions::NO_TLSV1_3);
    }
}

/// §4.3 "Client construction": common options, minimum version 1.2, and
/// (if `SSLKEYLOGFILE` is set at creation time) a key-log sink routed
/// through `logger`.
pub fn create_client(config: &CbConfig, logger: Arc<dyn Logger>) -> TlsContext {
    TlsContext {
        role: Role::Client,
        cipher_list: config.cipher_list.clone(),
        protocol_mask: config.protocol_mask,
        dhparams: None,
        prefer_server_ciphers: config.prefer_server_ciphers,
        session_tickets: config.session_tickets,
        alpn: config.alpn,
        identity: None,
        keylog: keylog_sink(logger),
    }
}

/// §4.3 "Server construction": either both `keyfile`/`certfile` are given
/// (PEM cert chain + PEM private key are loaded), or both are omitted
/// (delegates to [`eig::generate_ephemeral_identity`]).
pub fn create_server(
    config: &CbConfig,
    keyfile: Option<&Path>,
    certfile: Option<&Path>,
    logger: Arc<dyn Logger>,
) -> Result<TlsContext, TlsError> {
    let identity = match (keyfile, certfile) {
        (Some(keyfile), Some(certfile)) => {
            let cert = X509::from_pem(&std::fs::read(certfile)?)?;
            let key = PKey::private_key_from_pem(&std::fs::read(keyfile)?)?;
            (cert, key)
        }
        (None, None) => eig::generate_ephemeral_identity(eig::EPHEMERAL_CERT_PRODUCT)?,
        _ => panic!("create_server requires both keyfile and certfile, or neither"),
    };

    Ok(TlsContext {
        role: Role::Server,
        cipher_list: config.cipher_list.clone(),
        protocol_mask: config.protocol_mask,
        dhparams: None,
        prefer_server_ciphers: config.prefer_server_ciphers,
        session_tickets: config.session_tickets,
        alpn: config.alpn,
        identity: Some(identity),
        keylog: keylog_sink(logger),
    })
}

fn keylog_sink(logger: Arc<dyn Logger>) -> Option<Arc<dyn Logger>> {
    std::env::var_os("SSLKEYLOGFILE").map(|_| logger)
}

/// §4.3 "constructs a throwaway server context to validate".
pub fn valid_cipherlist(list: &str) -> bool {
    let Ok(mut builder) = SslContextBuilder::new(SslMethod::tls_server()) else {
        return false;
    };
    builder.set_cipher_list(list).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;

    fn config() -> CbConfig {
        CbConfig::default()
    }

    #[test]
    fn create_client_builds_a_session() {
        crate::pi::initialize();
        let ctx = create_client(&config(), Arc::new(NullLogger));
        assert!(ctx.new_session().is_ok());
    }

    #[test]
    fn create_server_without_paths_uses_ephemeral_identity() {
        crate::pi::initialize();
        let ctx = create_server(&config(), None, None, Arc::new(NullLogger)).unwrap();
        assert!(ctx.new_session().is_ok());
    }

    #[test]
    #[should_panic(expected = "must not be zero")]
    fn empty_protocol_mask_is_rejected() {
        crate::pi::initialize();
        let mut ctx = create_client(&config(), Arc::new(NullLogger));
        ctx.set_protocols(ProtocolMask {
            tls1_2: false,
            tls1_3: false,
        });
    }

    #[test]
    #[should_panic(expected = "must not be zero")]
    fn zero_mask_set_via_cbconfig_is_rejected_on_build() {
        // `ProtocolMask`'s fields are `pub`, so a caller can reach a zero
        // mask through `CbConfig` directly, never calling `set_protocols`.
        // The contract must still be enforced when the session is built.
        crate::pi::initialize();
        let config = CbConfig {
            protocol_mask: ProtocolMask {
                tls1_2: false,
                tls1_3: false,
            },
            ..CbConfig::default()
        };
        let ctx = create_client(&config, Arc::new(NullLogger));
        let _ = ctx.new_session();
    }

    #[test]
    fn valid_cipherlist_accepts_known_list() {
        assert!(valid_cipherlist("DEFAULT"));
    }

    #[test]
    fn valid_cipherlist_rejects_garbage() {
        assert!(!valid_cipherlist("not-a-real-cipher-suite"));
    }
}
