//! quotes-core - Core library for Quotes
//!
//! This crate contains the quote models, the durable key-value store, the
//! merge engine with its conflict log, and the sync orchestrator used by the
//! command-line client.

pub mod config;
pub mod conflicts;
pub mod db;
pub mod error;
pub mod export;
pub mod merge;
pub mod models;
pub mod notify;
pub mod remote;
pub mod repository;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Conflict, ConflictStatus, Quote, Resolution};
