//! Error types surfaced to callers.

/// Failure of a value-by-key accessor (`at`, `at_mut`).
///
/// Every other lookup or removal treats an absent key as an ordinary outcome
/// and reports it through `Option`, `bool` or the end cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("key not found")]
    NotFound,
}
