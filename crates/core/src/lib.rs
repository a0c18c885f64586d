//! Domain rules shared by the database and API layers.
//!
//! Nothing in this crate performs I/O.

pub mod error;
pub mod linking;
pub mod patch;
pub mod scopes;
pub mod types;
pub mod validation;
