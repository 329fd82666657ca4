//! Ledger row types
//!
//! Balances are bitemporal: one row per effective-time interval during which
//! a user's balance held a given integer value. The journal is append-only
//! and carries both time axes (effective date + recorded-at).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sentinel `valid_to` for the open balance version: 9999-12-31 23:59:59 UTC.
const FOREVER_UNIX_SECS: i64 = 253_402_300_799;

/// The `+∞` end of the open balance interval.
pub fn forever() -> DateTime<Utc> {
    DateTime::from_timestamp(FOREVER_UNIX_SECS, 0).expect("sentinel instant is representable")
}

/// One effective-time version of a user's balance.
///
/// The interval is `[valid_from, valid_to)`; the open version has
/// `valid_to = forever()`. Intervals for a user partition `[genesis, +∞)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Balance {
    pub user_id: String,
    pub amount: i64,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

impl Balance {
    /// Whether this is the open (current) version.
    pub fn is_open(&self) -> bool {
        self.valid_to == forever()
    }
}

/// Immutable record of one committed transfer.
///
/// `effective_date` is when the transfer takes economic effect;
/// `recorded_at` is when the row was written. Future-dated transfers record
/// now but take effect later, so `recorded_at >= effective_date` is not
/// guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: i64,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: i64,
    pub transaction_id: String,
    pub effective_date: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn forever_is_the_documented_sentinel() {
        let expected = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(forever(), expected);
    }

    #[test]
    fn open_version_detection() {
        let genesis = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let open = Balance {
            user_id: "user1".to_string(),
            amount: 1000,
            valid_from: genesis,
            valid_to: forever(),
        };
        assert!(open.is_open());

        let closed = Balance {
            valid_to: Utc.with_ymd_and_hms(2023, 6, 22, 10, 0, 0).unwrap(),
            ..open
        };
        assert!(!closed.is_open());
    }

    #[test]
    fn balance_serializes_with_rfc3339_instants() {
        let balance = Balance {
            user_id: "user1".to_string(),
            amount: 900,
            valid_from: Utc.with_ymd_and_hms(2023, 6, 22, 10, 0, 0).unwrap(),
            valid_to: forever(),
        };
        let json = serde_json::to_value(&balance).unwrap();
        assert_eq!(json["user_id"], "user1");
        assert_eq!(json["amount"], 900);
        assert_eq!(json["valid_from"], "2023-06-22T10:00:00Z");
        assert_eq!(json["valid_to"], "9999-12-31T23:59:59Z");
    }
}
