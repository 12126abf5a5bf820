//! The seam between ingestion and the document database

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::GatewayError;
use super::operations::{Operation, OperationResult};
use super::query::Filter;

/// A stored document: its id plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Anything that can list and write documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every document in `collection` matching all `filters`
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, GatewayError>;

    /// Execute one write
    async fn execute(&self, operation: &Operation) -> Result<OperationResult, GatewayError>;
}
