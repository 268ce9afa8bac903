use thiserror::Error;

/// Contract violations CC can detect at its own boundary; everything else
/// (not-found, duplicate) is the plain [`AddResult`](crate::cache::AddResult)/
/// `Option` surface, never an error per §7 ("ordinary return codes; never
/// logged").
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache name must be non-empty and contain no NUL bytes")]
    InvalidName,
}
