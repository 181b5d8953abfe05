//! Domain records shared by the relational and JSON mappings.
//!
//! # Responsibility
//! - Define the `Skills` record and the `Employee` record that owns it.
//! - Provide the flat wire/row shape both sources agree on.
//!
//! # Invariants
//! - A `Skills` record is identified by its employee reference alone.
//! - `Employee` is the owning side; `Skills` only holds a shared reference.

pub mod employee;
pub mod skills;
