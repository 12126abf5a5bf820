//! Document list queries
//!
//! Filters are sent to the BaaS as JSON-encoded `queries[]` parameters and
//! evaluated locally by the in-memory store.

pub mod filters;

pub use filters::Filter;
