use crate::RetryCfg;
use crate::error::Result as CoreResult;
use tally_traits::{AccessLog, AccountStore};

/// Run one summation to completion, returning the total in minor units.
///
/// Emits `tracing` start/complete/abort events around the operation; the
/// injected `AccessLog` remains the domain record of account accesses.
pub fn run<S, L>(store: S, log: L, retry: RetryCfg, account_ids: &[&str]) -> CoreResult<i64>
where
    S: AccountStore + 'static,
    L: AccessLog + 'static,
{
    let mut tally = crate::build_tally(store, log, Some(retry))?;
    tracing::info!(requested = account_ids.len(), "summation start");
    match tally.sum_accounts(account_ids) {
        Ok(total_minor) => {
            tracing::info!(
                total_minor,
                retries = tally.transient_retries(),
                "summation complete"
            );
            Ok(total_minor)
        }
        Err(e) => {
            tracing::error!(error = %e, "summation aborted");
            Err(e)
        }
    }
}
