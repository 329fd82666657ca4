//! Transfer engine
//!
//! Executes one transfer end-to-end under a single unit-of-work: validation,
//! lock acquisition in a fixed total order, idempotency check, debit/credit
//! against the bitemporal balance history, journal append, commit.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::postgres::PgConnection;

use crate::clock::Clock;
use crate::ledger::store::{self, LedgerStore};
use crate::ledger::{Balance, LedgerError};
use crate::transfer::command::TransferCommand;

/// Orchestrates transfers against the ledger store.
#[derive(Clone)]
pub struct TransferEngine {
    store: LedgerStore,
    clock: Arc<dyn Clock>,
}

impl TransferEngine {
    pub fn new(store: LedgerStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Execute a transfer. On any error the unit-of-work is rolled back and
    /// no balance version or journal row becomes observable.
    pub async fn execute(&self, command: TransferCommand) -> Result<(), LedgerError> {
        command.validate()?;

        // Postgres keeps microseconds; truncate up front so instants compare
        // equal after a round-trip through the store.
        let effective_date = command.effective_date.trunc_subsecs(6);

        let now = self.clock.now();
        if effective_date < now {
            return Err(LedgerError::EffectiveDateInPast);
        }

        let mut tx = self.store.begin().await?;

        // Locks in lexicographic user_id order. Two transfers sharing both
        // parties always acquire in the same order, so they cannot deadlock.
        for user_id in lock_order(&command.sender_id, &command.receiver_id) {
            store::lock_open_balance(&mut *tx, user_id).await?;
        }

        if store::journal_has(&mut *tx, &command.transaction_id).await? {
            return Err(LedgerError::DuplicateTransfer);
        }

        shift_balance(&mut *tx, &command.sender_id, -command.amount, effective_date).await?;
        shift_balance(&mut *tx, &command.receiver_id, command.amount, effective_date).await?;

        let recorded_at = self.clock.now().trunc_subsecs(6);
        store::journal_append(
            &mut *tx,
            &command.sender_id,
            &command.receiver_id,
            command.amount,
            &command.transaction_id,
            effective_date,
            recorded_at,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %command.transaction_id,
            sender_id = %command.sender_id,
            receiver_id = %command.receiver_id,
            amount = command.amount,
            effective_date = %effective_date,
            "transfer committed"
        );

        Ok(())
    }
}

/// The fixed global lock order: lexicographic by `user_id`.
fn lock_order<'a>(a: &'a str, b: &'a str) -> [&'a str; 2] {
    if a <= b { [a, b] } else { [b, a] }
}

/// Apply one leg of the transfer to a user's balance history.
///
/// The open version is already locked. A new version normally starts at the
/// effective date and the old one closes there; when the effective date
/// equals the open version's own `valid_from`, the amount is rewritten in
/// place instead, so no zero-length interval appears.
async fn shift_balance(
    conn: &mut PgConnection,
    user_id: &str,
    delta: i64,
    effective_date: DateTime<Utc>,
) -> Result<(), LedgerError> {
    let open: Balance = store::open_balance(&mut *conn, user_id).await?;

    let next = open
        .amount
        .checked_add(delta)
        .ok_or(LedgerError::InvalidAmount)?;
    if next < 0 {
        return Err(LedgerError::InsufficientFunds);
    }

    if effective_date == open.valid_from {
        store::update_open_amount(&mut *conn, user_id, next).await?;
    } else if effective_date > open.valid_from {
        store::close_open_balance(&mut *conn, user_id, effective_date).await?;
        store::insert_balance(&mut *conn, user_id, next, effective_date).await?;
    } else {
        // An earlier-dated transfer arriving after a later-dated one already
        // rewrote this user's open version. Applying it would break the
        // interval partition, so it is refused rather than reordered.
        return Err(LedgerError::TimestampConflict);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_order_is_total_and_symmetric() {
        assert_eq!(lock_order("user1", "user2"), ["user1", "user2"]);
        assert_eq!(lock_order("user2", "user1"), ["user1", "user2"]);
        assert_eq!(lock_order("abc", "abd"), ["abc", "abd"]);
    }
}
