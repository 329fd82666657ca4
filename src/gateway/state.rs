use crate::db::Database;
use crate::ledger::store::LedgerStore;
use crate::transfer::engine::TransferEngine;

/// Shared state for HTTP handlers.
pub struct AppState {
    pub db: Database,
    pub store: LedgerStore,
    pub engine: TransferEngine,
}

impl AppState {
    pub fn new(db: Database, store: LedgerStore, engine: TransferEngine) -> Self {
        Self { db, store, engine }
    }
}
