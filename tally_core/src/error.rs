use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TallyError {
    #[error("account fetch failed: {0}")]
    FetchFailed(String),
    #[error("retries exhausted for account {id} after {attempts} attempts")]
    RetriesExhausted { id: String, attempts: u32 },
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing account store")]
    MissingStore,
    #[error("missing access log")]
    MissingAccessLog,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
