//! In-memory stores owned by the ledger engine.
//!
//! One module per entity, mirroring the boundary each store guards:
//! the catalogue mutates, the shift store transitions, the two logs only
//! ever append.

pub mod catalogue;
pub mod refund;
pub mod shift;
pub mod transaction;

pub use catalogue::CatalogueStore;
pub use refund::RefundLog;
pub use shift::ShiftStore;
pub use transaction::TransactionLog;
