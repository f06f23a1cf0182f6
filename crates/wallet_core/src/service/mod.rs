//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads/writes around in-memory list operations.
//! - Keep CLI callers decoupled from storage and container details.

pub mod record_service;
