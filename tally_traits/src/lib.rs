pub mod error;

pub use error::StoreError;

/// A named balance record held by an external store.
///
/// Balances are fixed-point integers in minor currency units
/// (1 = 0.01 of the major unit) for deterministic accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub balance_minor: i64,
}

pub trait AccountStore {
    fn fetch_account(
        &mut self,
        id: &str,
    ) -> Result<Account, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait AccessLog {
    fn record_account_access(&mut self, master_id: &str, account_id: &str);
}

impl<T: AccountStore + ?Sized> AccountStore for Box<T> {
    fn fetch_account(
        &mut self,
        id: &str,
    ) -> Result<Account, Box<dyn std::error::Error + Send + Sync>> {
        (**self).fetch_account(id)
    }
}

impl<T: AccessLog + ?Sized> AccessLog for Box<T> {
    fn record_account_access(&mut self, master_id: &str, account_id: &str) {
        (**self).record_account_access(master_id, account_id);
    }
}
