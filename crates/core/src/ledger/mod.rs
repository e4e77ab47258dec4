//! The ledger entry engine.
//!
//! This module normalizes eight caller-facing operation kinds into one
//! canonical entry record:
//! - Domain types and the closed operation enum
//! - POS collection math (gross / commission / net)
//! - The entry factory with pre-write validation
//! - Error types for ledger operations

pub mod error;
pub mod factory;
pub mod pos;
pub mod types;

#[cfg(test)]
mod factory_props;

pub use error::LedgerError;
pub use factory::LedgerService;
pub use pos::{PosBreakdown, PosInput, PosMode};
pub use types::{
    ContactInfo, ContactKind, Direction, EntryDraft, LedgerContext, LedgerPolicy, Method,
    NewAttachment, NewEntry, Operation, OperationKind, OutflowCategory, ReferenceInfo,
    ResolvedOperation,
};
