//! Non-relational record sources.

pub mod json;
