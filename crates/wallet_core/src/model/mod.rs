//! Ledger domain model.
//!
//! # Responsibility
//! - Define the transaction record and the rules that keep it valid.
//! - Keep field validation reusable through one parametric rule type.
//!
//! # Invariants
//! - Only fully formed, validated records leave this module as `Record`.
//! - Partially filled state is always an explicit `RecordDraft`.

pub mod field;
pub mod record;
pub mod validator;
