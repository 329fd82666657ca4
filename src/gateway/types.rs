use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transfer::command::TransferCommand;

/// Reject empty strings at decode time.
fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("string must not be empty"));
    }
    Ok(s)
}

/// Transfer request (HTTP deserialization only).
///
/// Emptiness is caught while decoding; business validation happens in
/// [`TransferCommand`], which re-checks the structural rules as a backstop
/// for callers that bypass the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    /// Sender account (must not be empty)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub sender_id: String,
    /// Receiver account (must not be empty)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub receiver_id: String,
    pub amount: i64,
    /// Client idempotency key (must not be empty)
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    pub transaction_id: String,
    /// RFC3339 instant at which the transfer takes economic effect.
    pub effective_date: DateTime<Utc>,
}

impl From<TransactionRequest> for TransferCommand {
    fn from(req: TransactionRequest) -> Self {
        TransferCommand {
            sender_id: req.sender_id,
            receiver_id: req.receiver_id,
            amount: req.amount,
            transaction_id: req.transaction_id,
            effective_date: req.effective_date,
        }
    }
}

/// Optional effective-time cap on read projections.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn transaction_request_decodes_rfc3339() {
        let json = r#"{
            "sender_id": "user1",
            "receiver_id": "user2",
            "amount": 100,
            "transaction_id": "tx-1",
            "effective_date": "2023-06-22T10:00:00Z"
        }"#;
        let req: TransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.sender_id, "user1");
        assert_eq!(req.amount, 100);
        assert_eq!(
            req.effective_date,
            Utc.with_ymd_and_hms(2023, 6, 22, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn empty_ids_are_rejected_at_decode_time() {
        for field in ["sender_id", "receiver_id", "transaction_id"] {
            let mut body = serde_json::json!({
                "sender_id": "user1",
                "receiver_id": "user2",
                "amount": 100,
                "transaction_id": "tx-1",
                "effective_date": "2023-06-22T10:00:00Z"
            });
            body[field] = serde_json::json!("");
            let err = serde_json::from_value::<TransactionRequest>(body).unwrap_err();
            assert!(
                err.to_string().contains("must not be empty"),
                "{field} should be rejected when empty"
            );
        }
    }

    #[test]
    fn unparseable_timestamp_is_a_decode_error() {
        let json = r#"{
            "sender_id": "user1",
            "receiver_id": "user2",
            "amount": 100,
            "transaction_id": "tx-1",
            "effective_date": "next tuesday"
        }"#;
        assert!(serde_json::from_str::<TransactionRequest>(json).is_err());
    }

    #[test]
    fn error_body_has_the_contract_shape() {
        let body = serde_json::to_value(ErrorResponse::new("duplicate transaction")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "duplicate transaction"}));
    }
}
