//! Carelog Context Assembler
//!
//! Compresses a patient's structured records and document extractions into
//! one bounded text block for injection into the downstream AI triage
//! prompt. Pure transform: no I/O, no randomness, no wall-clock dependence;
//! identical input snapshots always produce byte-identical output.
//!
//! The caller is responsible for filtering to a single owner and excluding
//! soft-deleted entities before invoking [`ContextAssembler::assemble`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod config;

pub use assembler::ContextAssembler;
pub use config::ContextConfig;
