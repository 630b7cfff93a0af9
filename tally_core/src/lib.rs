#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Store-agnostic account summation engine.
//!
//! This crate sums account balances fetched from an external store. All
//! collaborator interactions go through the `tally_traits::AccountStore` and
//! `tally_traits::AccessLog` traits, so any store or log implementation can
//! be injected, test doubles included.
//!
//! ## Architecture
//!
//! - **Errors**: typed failures and the shared `Result` alias (`error` module)
//! - **Retry**: transient fetch failures are retried in place; permanent
//!   failures abort the whole operation (`TallyCore`)
//! - **Access log**: one record per successfully fetched account, emitted
//!   strictly after the fetch (`access_log` module for the file-backed impl)
//! - **Runner**: drive-to-completion entry point (`runner` module)
//!
//! ## Fixed-Point Arithmetic
//!
//! Balances are **minor units** (1 = 0.01 of the major currency unit) held
//! in `i64` for deterministic accumulation. The running total saturates
//! instead of wrapping.

// Module declarations
pub mod access_log;
pub mod error;
pub mod mocks;
pub mod runner;

use crate::error::{BuildError, Report, Result, TallyError};
use eyre::WrapErr;
use tally_traits::{AccessLog, Account, AccountStore, StoreError};

/// The fixed master account identifier prepended to every summation.
///
/// Always fetched first and always included in both the access-log sequence
/// and the accumulation, regardless of the caller-supplied list.
pub const MASTER_ACCOUNT_ID: &str = "master";

/// Retry policy for transient fetch failures.
#[derive(Debug, Clone, Default)]
pub struct RetryCfg {
    /// Total fetch attempts allowed per account. `None` retries transient
    /// failures indefinitely; `Some(n)` fails the operation with
    /// `TallyError::RetriesExhausted` once n attempts have failed.
    /// Must be >= 1 when set.
    pub max_attempts: Option<u32>,
}

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct TallyCore<S: AccountStore, L: AccessLog> {
    store: S,
    log: L,
    retry: RetryCfg,
    // Transient failures absorbed by the most recent sum_accounts call
    transient_retries: u64,
}

impl<S: AccountStore, L: AccessLog> core::fmt::Debug for TallyCore<S, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TallyCore")
            .field("retry", &self.retry)
            .field("transient_retries", &self.transient_retries)
            .finish()
    }
}

impl<S: AccountStore, L: AccessLog> TallyCore<S, L> {
    /// Sum the positive balances of the master account plus `account_ids`,
    /// in that order. Duplicates are processed independently.
    ///
    /// Returns the total in minor units, or the first permanent failure as
    /// `TallyError::FetchFailed` with the failing identifier. On failure no
    /// partial sum is returned and no further identifiers are processed.
    pub fn sum_accounts(&mut self, account_ids: &[&str]) -> Result<i64> {
        self.transient_retries = 0;
        let mut total_minor: i64 = 0;
        tracing::debug!(requested = account_ids.len(), "summation start");
        for id in core::iter::once(MASTER_ACCOUNT_ID).chain(account_ids.iter().copied()) {
            let account = self.fetch_with_retry(id)?;
            // Record strictly after the fetch succeeded, exactly once per id.
            self.log.record_account_access(MASTER_ACCOUNT_ID, id);
            if account.balance_minor > 0 {
                total_minor = total_minor.saturating_add(account.balance_minor);
            }
        }
        Ok(total_minor)
    }

    /// Telemetry: transient failures absorbed by the last `sum_accounts` call.
    pub fn transient_retries(&self) -> u64 {
        self.transient_retries
    }

    /// Return the configured retry policy.
    pub fn retry_cfg(&self) -> &RetryCfg {
        &self.retry
    }

    fn fetch_with_retry(&mut self, id: &str) -> Result<Account> {
        let mut attempt: u32 = 1;
        loop {
            match self.store.fetch_account(id) {
                Ok(account) => return Ok(account),
                Err(e) if is_transient_fetch(&*e) => {
                    self.transient_retries = self.transient_retries.saturating_add(1);
                    tracing::debug!(id, attempt, error = %e, "transient fetch failure, retrying");
                    if let Some(max) = self.retry.max_attempts
                        && attempt >= max
                    {
                        return Err(Report::new(TallyError::RetriesExhausted {
                            id: id.to_string(),
                            attempts: attempt,
                        }))
                        .wrap_err("fetching account");
                    }
                    attempt = attempt.saturating_add(1);
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "permanent fetch failure");
                    return Err(Report::new(TallyError::FetchFailed(id.to_string())))
                        .wrap_err("fetching account");
                }
            }
        }
    }
}

// Classify a collaborator error by its typed kind. Anything that is not a
// StoreError::Transient aborts; message text is never consulted.
fn is_transient_fetch(e: &(dyn std::error::Error + 'static)) -> bool {
    matches!(
        e.downcast_ref::<StoreError>(),
        Some(StoreError::Transient(_))
    )
}


/// Public dynamic (boxed) engine that preserves the builder API via composition.
pub struct Tally {
    inner: TallyCore<Box<dyn AccountStore>, Box<dyn AccessLog>>,
}

impl core::fmt::Debug for Tally {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tally")
            .field("retry", &self.inner.retry)
            .field("transient_retries", &self.inner.transient_retries)
            .finish()
    }
}

impl Tally {
    /// Start building a Tally.
    pub fn builder() -> TallyBuilder<Missing, Missing> {
        TallyBuilder::default()
    }

    /// See [`TallyCore::sum_accounts`].
    pub fn sum_accounts(&mut self, account_ids: &[&str]) -> Result<i64> {
        self.inner.sum_accounts(account_ids)
    }

    /// Telemetry: transient failures absorbed by the last `sum_accounts` call.
    pub fn transient_retries(&self) -> u64 {
        self.inner.transient_retries()
    }

    /// Return the configured retry policy.
    pub fn retry_cfg(&self) -> &RetryCfg {
        self.inner.retry_cfg()
    }
}

// Type-state markers for the builder
pub struct Missing;
pub struct Set;

use std::marker::PhantomData;

/// Builder for `Tally`. Config is validated on `build()`.
pub struct TallyBuilder<S, L> {
    store: Option<Box<dyn AccountStore>>,
    log: Option<Box<dyn AccessLog>>,
    retry: Option<RetryCfg>,
    // Type-state markers
    _s: PhantomData<S>,
    _l: PhantomData<L>,
}

impl Default for TallyBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            store: None,
            log: None,
            retry: None,
            _s: PhantomData,
            _l: PhantomData,
        }
    }
}

impl<S, L> TallyBuilder<S, L> {
    /// Fallible build available in any type-state; returns a detailed
    /// BuildError for missing pieces.
    pub fn try_build(self) -> Result<Tally> {
        let TallyBuilder {
            store,
            log,
            retry,
            _s: _,
            _l: _,
        } = self;

        let store = store.ok_or_else(|| Report::new(BuildError::MissingStore))?;
        let log = log.ok_or_else(|| Report::new(BuildError::MissingAccessLog))?;
        let retry = retry.unwrap_or_default();
        validate_retry(&retry)?;

        Ok(Tally {
            inner: TallyCore {
                store,
                log,
                retry,
                transient_retries: 0,
            },
        })
    }

    pub fn with_retry(mut self, retry: RetryCfg) -> Self {
        self.retry = Some(retry);
        self
    }
}

// Setters that advance type-state when providing mandatory collaborators
impl<L> TallyBuilder<Missing, L> {
    pub fn with_store(self, store: impl AccountStore + 'static) -> TallyBuilder<Set, L> {
        let TallyBuilder {
            store: _,
            log,
            retry,
            _s: _,
            _l: _,
        } = self;
        TallyBuilder {
            store: Some(Box::new(store)),
            log,
            retry,
            _s: PhantomData,
            _l: PhantomData,
        }
    }
}

impl<S> TallyBuilder<S, Missing> {
    pub fn with_access_log(self, log: impl AccessLog + 'static) -> TallyBuilder<S, Set> {
        let TallyBuilder {
            store,
            log: _,
            retry,
            _s: _,
            _l: _,
        } = self;
        TallyBuilder {
            store,
            log: Some(Box::new(log)),
            retry,
            _s: PhantomData,
            _l: PhantomData,
        }
    }
}

impl TallyBuilder<Set, Set> {
    /// Validate and build the Tally. Only available once both the store and
    /// the access log are set.
    pub fn build(self) -> Result<Tally> {
        self.try_build()
    }
}

fn validate_retry(retry: &RetryCfg) -> Result<()> {
    if retry.max_attempts == Some(0) {
        return Err(Report::new(BuildError::InvalidConfig(
            "max_attempts must be >= 1",
        )));
    }
    Ok(())
}

/// Generic, statically-dispatched alias using the unified core.
pub type TallyG<S, L> = TallyCore<S, L>;

/// Build a generic, statically-dispatched TallyG from concrete collaborators.
pub fn build_tally<S, L>(store: S, log: L, retry: Option<RetryCfg>) -> Result<TallyG<S, L>>
where
    S: AccountStore + 'static,
    L: AccessLog + 'static,
{
    let retry = retry.unwrap_or_default();
    validate_retry(&retry)?;
    Ok(TallyG {
        store,
        log,
        retry,
        transient_retries: 0,
    })
}
