//! Process-singleton crypto initializer (§4.2).
//!
//! `PiState` is the testable state machine; `initialize`/`shutdown` below
//! wrap one process-wide instance of it, matching §9's "isolate it behind
//! a dedicated initialization collaborator" note while keeping the
//! ambient-singleton surface the rest of the crate actually calls.

use std::sync::atomic::{AtomicU8, Ordering};

const UNINIT: u8 = 0;
const INITIALIZING: u8 = 1;
const INITIALIZED: u8 = 2;
const SHUTDOWN: u8 = 3;

/// Once-guard over the crypto provider's init/teardown sequence.
///
/// The `Acquire`/`Release` pair on `state` is the happens-before edge
/// §5 requires between `initialize()` completing on one thread and any
/// other thread's subsequent `CB` call observing it.
pub struct PiState {
    state: AtomicU8,
}

impl PiState {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINIT),
        }
    }

    /// Idempotent. Panics if called after [`shutdown`](Self::shutdown) —
    /// "no re-initialize after shutdown" is a contract violation, not a
    /// recoverable error.
    pub fn initialize(&self) {
        loop {
            match self
                .state
                .compare_exchange(UNINIT, INITIALIZING, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    openssl::init();
                    self.state.store(INITIALIZED, Ordering::Release);
                    return;
                }
                Err(INITIALIZED) => return,
                Err(SHUTDOWN) => panic!("PI::initialize called after shutdown"),
                Err(INITIALIZING) => std::hint::spin_loop(),
                Err(_) => unreachable!("unknown PI state"),
            }
        }
    }

    /// Idempotent. Panics if called before [`initialize`](Self::initialize)
    /// has completed — "shutdown happens only after initialize".
    ///
    /// The `openssl` crate exposes no teardown call (modern OpenSSL needs
    /// none), so this only flips the contract flag.
    pub fn shutdown(&self) {
        match self
            .state
            .compare_exchange(INITIALIZED, SHUTDOWN, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) | Err(SHUTDOWN) => {}
            Err(UNINIT) | Err(INITIALIZING) => panic!("PI::shutdown called before initialize"),
            Err(_) => unreachable!("unknown PI state"),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == INITIALIZED
    }
}

impl Default for PiState {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: PiState = PiState::new();

/// Brings up the process-wide crypto provider. Must happen-before any
/// [`crate::cb`] call on every thread.
pub fn initialize() {
    GLOBAL.initialize();
}

pub fn shutdown() {
    GLOBAL.shutdown();
}

pub fn is_initialized() -> bool {
    GLOBAL.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let pi = PiState::new();
        pi.initialize();
        pi.initialize();
        assert!(pi.is_initialized());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let pi = PiState::new();
        pi.initialize();
        pi.shutdown();
        pi.shutdown();
        assert!(!pi.is_initialized());
    }

    #[test]
    #[should_panic(expected = "after shutdown")]
    fn reinitialize_after_shutdown_panics() {
        let pi = PiState::new();
        pi.initialize();
        pi.shutdown();
        pi.initialize();
    }

    #[test]
    #[should_panic(expected = "before initialize")]
    fn shutdown_before_initialize_panics() {
        let pi = PiState::new();
        pi.shutdown();
    }
}
