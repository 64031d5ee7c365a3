//! Long-lived services shared between the sync loop and front-ends.

mod library;

pub use library::{ImportSummary, QuoteLibrary};
