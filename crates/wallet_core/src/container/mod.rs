//! In-memory record containers.
//!
//! # Responsibility
//! - Materialize persisted records for positional and keyed operations.
//!
//! # Invariants
//! - Containers only accept records validated by their own rules.

pub mod record_list;
