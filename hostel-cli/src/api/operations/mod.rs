//! Document write operations
//!
//! This module provides a unified description of the writes issued against
//! the BaaS document database, so they can be executed, logged or recorded
//! by any [`DocumentStore`](crate::api::DocumentStore).

pub mod operation;

pub use operation::{Operation, OperationResult};
