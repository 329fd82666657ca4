//! Read projections
//!
//! Point-in-time views over the ledger along the effective-time axis. Each
//! projection is a single read statement against the store; no unit-of-work
//! is opened.

use chrono::{DateTime, Utc};

use crate::ledger::LedgerError;
use crate::ledger::models::{Balance, JournalEntry};
use crate::ledger::store::LedgerStore;

/// Effective balance of a user as of `as_of` (the open version when `None`).
///
/// Fails with `UserMissing` when no version's interval contains the instant,
/// which includes any instant before the user's genesis.
pub async fn balance_as_of(
    store: &LedgerStore,
    user_id: &str,
    as_of: Option<DateTime<Utc>>,
) -> Result<Balance, LedgerError> {
    store.balance_as_of(user_id, as_of).await
}

/// Transfer journal filtered by party, capped at `effective_date <= as_of`
/// when supplied, newest first (`effective_date DESC, recorded_at DESC`).
///
/// A user with no activity produces an empty list; this projection never
/// fails with `UserMissing`.
pub async fn history_for(
    store: &LedgerStore,
    user_id: &str,
    as_of: Option<DateTime<Utc>>,
) -> Result<Vec<JournalEntry>, LedgerError> {
    store.history_for(user_id, as_of).await
}
