//! # Tillpoint Ledger
//!
//! Stores, ledger engine, and derived reports for the Tillpoint till.
//! Everything mutable lives behind [`LedgerEngine`]; the pure value types
//! and validation rules come from `tillpoint-core`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tillpoint-ledger                                 │
//! │                                                                         │
//! │   engine ──────── LedgerEngine: the single serialization boundary.     │
//! │      │            Validate-then-commit under one lock.                 │
//! │      ├── store ── CatalogueStore, ShiftStore, and the two              │
//! │      │            append-only logs (transactions, refunds)             │
//! │      └── reports  pure folds over the logs: payment breakdown,         │
//! │                   refund breakdown, expected cash in drawer            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod reports;
pub mod store;

pub use engine::{LedgerEngine, TransactionRequest};
