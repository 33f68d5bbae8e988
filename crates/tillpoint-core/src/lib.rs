//! # tillpoint-core: Pure Business Logic for Tillpoint
//!
//! This crate is the **heart** of the Tillpoint till ledger. It contains the
//! domain types and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tillpoint Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      POS Frontend (external)                    │   │
//! │  │    Catalogue UI ──► Cart UI ──► Tender UI ──► Cashup UI        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  tillpoint-ledger (engine)                      │   │
//! │  │    create_transaction, create_refund, start/end_shift, reports  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tillpoint-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Ledger   │  │   rules   │  │   │
//! │  │   │   Shift   │  │  (cents)  │  │   Error   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: all monetary values are cents (i64); the only
//!    tolerated imprecision is the 1-cent split-payment comparison window
//! 2. **Closed enums**: payment methods are tagged variants, so report
//!    folds match exhaustively
//! 3. **Explicit Errors**: all failures are typed and recoverable, never
//!    strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tillpoint_core::Money` instead of
// `use tillpoint_core::money::Money`

pub use error::{LedgerError, LedgerResult, ValidationError};
pub use money::{Money, SPLIT_TOLERANCE_CENTS};
pub use types::*;
