use thiserror::Error;

/// Maximum byte length of a key, matching the wire-format length prefix
/// the rest of the cache stack uses for names.
pub const MAX_KEY_LEN: usize = u16::MAX as usize;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HashMapError {
    #[error("key length {0} exceeds the maximum of {MAX_KEY_LEN}")]
    KeyTooLong(usize),
}
