use chrono::{DateTime, Utc};

use crate::ledger::LedgerError;

/// One requested transfer, as accepted at the boundary.
///
/// `transaction_id` is the client-supplied idempotency key; submitting the
/// same command twice commits exactly one transfer.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: i64,
    pub transaction_id: String,
    pub effective_date: DateTime<Utc>,
}

impl TransferCommand {
    /// Structural checks that need no store access.
    ///
    /// The effective-date-versus-now check lives in the engine, which owns
    /// the clock.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.sender_id.is_empty() {
            return Err(LedgerError::InvalidRequest("sender_id must not be empty"));
        }
        if self.receiver_id.is_empty() {
            return Err(LedgerError::InvalidRequest("receiver_id must not be empty"));
        }
        if self.transaction_id.is_empty() {
            return Err(LedgerError::InvalidRequest("transaction_id must not be empty"));
        }
        if self.sender_id == self.receiver_id {
            return Err(LedgerError::SelfTransfer);
        }
        if self.amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn command() -> TransferCommand {
        TransferCommand {
            sender_id: "user1".to_string(),
            receiver_id: "user2".to_string(),
            amount: 100,
            transaction_id: "tx-1".to_string(),
            effective_date: Utc.with_ymd_and_hms(2023, 6, 22, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn well_formed_command_passes() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn empty_fields_are_rejected() {
        for field in ["sender_id", "receiver_id", "transaction_id"] {
            let mut cmd = command();
            match field {
                "sender_id" => cmd.sender_id.clear(),
                "receiver_id" => cmd.receiver_id.clear(),
                _ => cmd.transaction_id.clear(),
            }
            assert!(
                matches!(cmd.validate(), Err(LedgerError::InvalidRequest(_))),
                "{field} should be required"
            );
        }
    }

    #[test]
    fn self_transfer_is_rejected() {
        let mut cmd = command();
        cmd.receiver_id = cmd.sender_id.clone();
        assert!(matches!(cmd.validate(), Err(LedgerError::SelfTransfer)));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        let mut cmd = command();
        cmd.amount = 0;
        assert!(matches!(cmd.validate(), Err(LedgerError::InvalidAmount)));

        cmd.amount = -100;
        assert!(matches!(cmd.validate(), Err(LedgerError::InvalidAmount)));
    }

    #[test]
    fn very_large_amounts_are_structurally_fine() {
        let mut cmd = command();
        cmd.amount = i64::MAX;
        assert!(cmd.validate().is_ok());
    }
}
