//! Data models for quotes

mod conflict;
mod quote;

pub use conflict::{make_conflict_id, Conflict, ConflictStatus, Resolution};
pub use quote::Quote;
