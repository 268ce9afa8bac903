//! The logger collaborator (§1: "a logger (record an event at a severity)").
//!
//! Kept as a minimal object-safe trait rather than a hard dependency on any
//! particular subscriber, so a host DNS server can route events into
//! whatever `tracing` layers it already runs.

/// Severities this crate ever emits. CB logs at `Error` on provider
/// failure; the `SSLKEYLOGFILE` sink logs at `Info`; PI logs only fatal
/// conditions, which in this crate means a `panic!`, not a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

pub trait Logger: Send + Sync {
    fn event(&self, level: Level, target: &str, message: &str);
}

/// Forwards events into whatever `tracing` subscriber the host process has
/// installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn event(&self, level: Level, target: &str, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "dnscore_tls", %target, "{message}"),
            Level::Error => tracing::error!(target: "dnscore_tls", %target, "{message}"),
        }
    }
}

/// Discards every event. Useful for tests and for callers with no
/// observability stack wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn event(&self, _level: Level, _target: &str, _message: &str) {}
}
