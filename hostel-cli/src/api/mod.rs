//! Document database access
//!
//! This module provides the persistence side of ingestion: write
//! [`Operation`]s, list [`Filter`]s, the [`DocumentStore`] seam and the
//! HTTP client for the BaaS document REST API.

pub mod client;
pub mod dry_run;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod operations;
pub mod query;
pub mod store;

pub use client::BaasClient;
pub use dry_run::DryRunStore;
pub use error::GatewayError;
pub use operations::{Operation, OperationResult};
pub use query::Filter;
pub use store::{Document, DocumentStore};
