use thiserror::Error;

/// Failure raised by an [`crate::AccountStore`] for a single fetch attempt.
///
/// The kind is a closed tagged variant so callers can decide between retry
/// and abort without inspecting message text.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Expected to resolve on an immediate retry (e.g. a dropped connection).
    #[error("transient store failure: {0}")]
    Transient(String),
    /// Will not resolve by retrying; the whole operation must abort.
    #[error("permanent store failure: {0}")]
    Permanent(String),
}
