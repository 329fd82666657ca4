//! chronoledger - bitemporal monetary transfer service
//!
//! Moves integer funds between named accounts and keeps an auditable ledger
//! along two time axes: the effective date at which a transfer takes
//! economic effect and the system instant at which it was recorded.
//!
//! # Modules
//!
//! - [`ledger`] - Bitemporal Postgres store (balance versions + journal)
//! - [`transfer`] - The transfer engine (locking, idempotency, debit/credit)
//! - [`projections`] - Point-in-time balance and history reads
//! - [`gateway`] - HTTP boundary (axum)
//! - [`clock`] - Injectable system-time source
//! - [`config`] - Environment-driven configuration
//! - [`db`] - Connection pool and schema bootstrap

pub mod clock;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod projections;
pub mod transfer;

// Convenient re-exports at crate root
pub use clock::{Clock, SequenceClock, SystemClock};
pub use config::AppConfig;
pub use db::Database;
pub use ledger::{Balance, JournalEntry, LedgerError, LedgerStore, forever};
pub use transfer::{TransferCommand, TransferEngine};
