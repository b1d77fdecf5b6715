//! Domain model for the class roll registry.
//!
//! # Responsibility
//! - Define the canonical Class and Student records used by core logic.
//! - Own field-level normalization and validation rules for user input.
//!
//! # Invariants
//! - Every record is identified by a stable UUID generated on creation.
//! - Division labels are stored uppercase; all text fields are trimmed.
//! - A Student holds a Class id as a lookup key, never a copy of Class fields.

pub mod class;
pub mod student;
pub mod validation;
