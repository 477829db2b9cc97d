//! Core building blocks for Aiplex.
//!
//! - [`config`] — typed configuration, JSON loader and env overrides
//! - [`types`] — model entries, API key records, usage snapshot
//! - [`catalog`] — in-memory model catalog
//! - [`keys`] — in-memory API key store
//! - [`usage`] — call/cost accounting
//! - [`utils`] — paths and small string helpers

pub mod catalog;
pub mod config;
pub mod keys;
pub mod types;
pub mod usage;
pub mod utils;

pub use catalog::ModelCatalog;
pub use keys::KeyStore;
pub use types::{ApiKeyEntry, KeySummary, ModelEntry, ModelKind, NewApiKey, NewModel, UsageStats};
pub use usage::UsageTracker;
