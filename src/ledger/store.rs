//! Ledger store
//!
//! PostgreSQL-backed bitemporal storage for users, balance versions, and the
//! transfer journal. Mutations run inside a caller-owned unit-of-work
//! ([`LedgerStore::begin`]); correctness under concurrency comes entirely
//! from row locks on the open balance versions plus the unique index on
//! `transaction_id`. No in-process synchronization is involved.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnection;
use sqlx::{PgPool, Postgres, Transaction};

use super::error::LedgerError;
use super::models::{Balance, JournalEntry, forever};

/// Typed access to the three ledger tables.
#[derive(Clone)]
pub struct LedgerStore {
    pool: PgPool,
}

impl LedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a unit-of-work. Dropping the transaction without committing
    /// rolls back every write performed under it.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, LedgerError> {
        Ok(self.pool.begin().await?)
    }

    /// Balance version whose interval contains `as_of`, or the open version
    /// when `as_of` is `None`.
    pub async fn balance_as_of(
        &self,
        user_id: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Balance, LedgerError> {
        let row = match as_of {
            Some(instant) => {
                sqlx::query_as::<_, Balance>(
                    "SELECT user_id, amount, valid_from, valid_to FROM balances
                     WHERE user_id = $1 AND valid_from <= $2 AND valid_to > $2",
                )
                .bind(user_id)
                .bind(instant)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Balance>(
                    "SELECT user_id, amount, valid_from, valid_to FROM balances
                     WHERE user_id = $1 AND valid_to = $2",
                )
                .bind(user_id)
                .bind(forever())
                .fetch_optional(&self.pool)
                .await?
            }
        };

        row.ok_or_else(|| LedgerError::UserMissing(user_id.to_string()))
    }

    /// Journal entries where the user is sender or receiver, capped at
    /// `effective_date <= as_of` when supplied. A user with no activity
    /// yields an empty list, never `UserMissing`.
    pub async fn history_for(
        &self,
        user_id: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let entries = match as_of {
            Some(instant) => {
                sqlx::query_as::<_, JournalEntry>(
                    "SELECT id, sender_id, receiver_id, amount, transaction_id,
                            effective_date, recorded_at
                     FROM transaction_history
                     WHERE (sender_id = $1 OR receiver_id = $1) AND effective_date <= $2
                     ORDER BY effective_date DESC, recorded_at DESC",
                )
                .bind(user_id)
                .bind(instant)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, JournalEntry>(
                    "SELECT id, sender_id, receiver_id, amount, transaction_id,
                            effective_date, recorded_at
                     FROM transaction_history
                     WHERE sender_id = $1 OR receiver_id = $1
                     ORDER BY effective_date DESC, recorded_at DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(entries)
    }

    /// Create a user together with their genesis open balance version.
    ///
    /// Users are provisioned out-of-band; the transfer core never creates
    /// them. Used by operators and test fixtures.
    pub async fn provision_user(
        &self,
        user_id: &str,
        username: &str,
        opening_amount: i64,
        genesis: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let mut tx = self.begin().await?;

        sqlx::query("INSERT INTO users (user_id, username) VALUES ($1, $2)")
            .bind(user_id)
            .bind(username)
            .execute(&mut *tx)
            .await?;

        insert_balance(&mut *tx, user_id, opening_amount, genesis).await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Acquire an exclusive row lock on the user's open balance version.
///
/// Blocks until any concurrent transfer touching this user commits or
/// aborts. Fails with `UserMissing` when the user has no open version.
pub async fn lock_open_balance(
    conn: &mut PgConnection,
    user_id: &str,
) -> Result<(), LedgerError> {
    let row = sqlx::query(
        "SELECT user_id FROM balances WHERE user_id = $1 AND valid_to = $2 FOR UPDATE",
    )
    .bind(user_id)
    .bind(forever())
    .fetch_optional(conn)
    .await?;

    match row {
        Some(_) => Ok(()),
        None => Err(LedgerError::UserMissing(user_id.to_string())),
    }
}

/// Read the currently open balance version.
pub async fn open_balance(
    conn: &mut PgConnection,
    user_id: &str,
) -> Result<Balance, LedgerError> {
    sqlx::query_as::<_, Balance>(
        "SELECT user_id, amount, valid_from, valid_to FROM balances
         WHERE user_id = $1 AND valid_to = $2",
    )
    .bind(user_id)
    .bind(forever())
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| LedgerError::UserMissing(user_id.to_string()))
}

/// Close the open version at `at`: its interval becomes `[valid_from, at)`.
pub async fn close_open_balance(
    conn: &mut PgConnection,
    user_id: &str,
    at: DateTime<Utc>,
) -> Result<(), LedgerError> {
    sqlx::query("UPDATE balances SET valid_to = $1 WHERE user_id = $2 AND valid_to = $3")
        .bind(at)
        .bind(user_id)
        .bind(forever())
        .execute(conn)
        .await?;
    Ok(())
}

/// Insert a new open version starting at `valid_from`.
pub async fn insert_balance(
    conn: &mut PgConnection,
    user_id: &str,
    amount: i64,
    valid_from: DateTime<Utc>,
) -> Result<(), LedgerError> {
    sqlx::query(
        "INSERT INTO balances (user_id, amount, valid_from, valid_to) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(amount)
    .bind(valid_from)
    .bind(forever())
    .execute(conn)
    .await?;
    Ok(())
}

/// Rewrite the open version's amount in place.
///
/// Used when a transfer's effective date equals the open version's
/// `valid_from`: closing the row there would leave a zero-length interval.
pub async fn update_open_amount(
    conn: &mut PgConnection,
    user_id: &str,
    amount: i64,
) -> Result<(), LedgerError> {
    sqlx::query("UPDATE balances SET amount = $1 WHERE user_id = $2 AND valid_to = $3")
        .bind(amount)
        .bind(user_id)
        .bind(forever())
        .execute(conn)
        .await?;
    Ok(())
}

/// Whether a transfer with this `transaction_id` is already journaled.
pub async fn journal_has(
    conn: &mut PgConnection,
    transaction_id: &str,
) -> Result<bool, LedgerError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM transaction_history WHERE transaction_id = $1",
    )
    .bind(transaction_id)
    .fetch_one(conn)
    .await?;

    Ok(count > 0)
}

/// Append the journal row for a committed transfer.
///
/// The unique index on `transaction_id` backstops the pre-insert idempotency
/// check: a concurrent duplicate that slipped past the check fails here with
/// `DuplicateTransfer`.
#[allow(clippy::too_many_arguments)]
pub async fn journal_append(
    conn: &mut PgConnection,
    sender_id: &str,
    receiver_id: &str,
    amount: i64,
    transaction_id: &str,
    effective_date: DateTime<Utc>,
    recorded_at: DateTime<Utc>,
) -> Result<(), LedgerError> {
    sqlx::query(
        "INSERT INTO transaction_history
             (sender_id, receiver_id, amount, transaction_id, effective_date, recorded_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(amount)
    .bind(transaction_id)
    .bind(effective_date)
    .bind(recorded_at)
    .execute(conn)
    .await
    .map_err(LedgerError::from_journal_insert)?;
    Ok(())
}
