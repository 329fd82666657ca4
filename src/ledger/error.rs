use thiserror::Error;

/// Error taxonomy surfaced by the ledger core.
///
/// Every error aborts the current unit-of-work; nothing is recovered below
/// the request boundary. The boundary maps each kind to a status code, so
/// the messages here stay stable per kind.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("sender and receiver must differ")]
    SelfTransfer,

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("effective date is in the past")]
    EffectiveDateInPast,

    #[error("user has no open balance: {0}")]
    UserMissing(String),

    #[error("insufficient balance")]
    InsufficientFunds,

    #[error("duplicate transaction")]
    DuplicateTransfer,

    #[error("effective date precedes the latest balance version")]
    TimestampConflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    /// Collapse a unique-constraint violation on `transaction_id` into
    /// [`LedgerError::DuplicateTransfer`]. The pre-insert idempotency check
    /// gives the clean error on the common path; this catches the loser of a
    /// concurrent duplicate race at the unique index.
    pub fn from_journal_insert(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                LedgerError::DuplicateTransfer
            }
            _ => LedgerError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable_per_kind() {
        assert_eq!(
            LedgerError::SelfTransfer.to_string(),
            "sender and receiver must differ"
        );
        assert_eq!(LedgerError::InvalidAmount.to_string(), "amount must be positive");
        assert_eq!(
            LedgerError::EffectiveDateInPast.to_string(),
            "effective date is in the past"
        );
        assert_eq!(
            LedgerError::UserMissing("ghost".to_string()).to_string(),
            "user has no open balance: ghost"
        );
        assert_eq!(LedgerError::InsufficientFunds.to_string(), "insufficient balance");
        assert_eq!(LedgerError::DuplicateTransfer.to_string(), "duplicate transaction");
    }

    #[test]
    fn non_unique_violation_stays_a_database_error() {
        let err = LedgerError::from_journal_insert(sqlx::Error::RowNotFound);
        assert!(matches!(err, LedgerError::Database(_)));
    }
}
