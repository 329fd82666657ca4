//! Ledger schema bootstrap
//!
//! Idempotent DDL executed at startup. The unique index on `transaction_id`
//! and the row-level CHECKs are load-bearing: the transfer engine relies on
//! them to reject duplicate-race losers and malformed intervals even when an
//! application-level check is bypassed.

use anyhow::{Context, Result};
use sqlx::PgPool;

pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing ledger schema...");

    sqlx::query(CREATE_USERS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create users table")?;

    sqlx::query(CREATE_BALANCES_TABLE)
        .execute(pool)
        .await
        .context("Failed to create balances table")?;

    sqlx::query(CREATE_BALANCES_OPEN_ROW_INDEX)
        .execute(pool)
        .await
        .context("Failed to create balances index")?;

    sqlx::query(CREATE_HISTORY_TABLE)
        .execute(pool)
        .await
        .context("Failed to create transaction_history table")?;

    for (ddl, what) in [
        (CREATE_HISTORY_SENDER_INDEX, "sender index"),
        (CREATE_HISTORY_RECEIVER_INDEX, "receiver index"),
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create transaction_history {what}"))?;
    }

    tracing::info!("Ledger schema initialized");
    Ok(())
}

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id VARCHAR(255) PRIMARY KEY,
    username VARCHAR(255) NOT NULL
)
"#;

const CREATE_BALANCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS balances (
    user_id VARCHAR(255) NOT NULL REFERENCES users(user_id),
    amount BIGINT NOT NULL CHECK (amount >= 0),
    valid_from TIMESTAMPTZ NOT NULL,
    valid_to TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (user_id, valid_from),
    CHECK (valid_from < valid_to)
)
"#;

// Accelerates the open-row lookup (valid_to = +infinity sentinel)
const CREATE_BALANCES_OPEN_ROW_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_balances_user_valid_to ON balances (user_id, valid_to)
"#;

const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transaction_history (
    id BIGSERIAL PRIMARY KEY,
    sender_id VARCHAR(255) NOT NULL REFERENCES users(user_id),
    receiver_id VARCHAR(255) NOT NULL REFERENCES users(user_id),
    amount BIGINT NOT NULL CHECK (amount > 0),
    transaction_id VARCHAR(255) NOT NULL UNIQUE,
    effective_date TIMESTAMPTZ NOT NULL,
    recorded_at TIMESTAMPTZ NOT NULL
)
"#;

const CREATE_HISTORY_SENDER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_history_sender ON transaction_history (sender_id)
"#;

const CREATE_HISTORY_RECEIVER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_history_receiver ON transaction_history (receiver_id)
"#;
