//! Test and helper mocks for tally_core

use tally_traits::{AccessLog, Account, AccountStore, StoreError};

/// A store that permanently fails every fetch; useful for wiring and
/// builder tests that never reach a successful fetch.
pub struct NoopStore;

impl AccountStore for NoopStore {
    fn fetch_account(
        &mut self,
        id: &str,
    ) -> Result<Account, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(StoreError::Permanent(format!(
            "noop store: {id}"
        ))))
    }
}

/// An access log that discards every record.
pub struct NullLog;

impl AccessLog for NullLog {
    fn record_account_access(&mut self, _master_id: &str, _account_id: &str) {}
}
