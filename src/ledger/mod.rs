//! Bitemporal ledger store
//!
//! Owns the three tables (`users`, `balances`, `transaction_history`) and
//! every query or mutation against them. Upper layers never touch SQL.

pub mod error;
pub mod models;
pub mod store;

pub use error::LedgerError;
pub use models::{Balance, JournalEntry, forever};
pub use store::LedgerStore;
