//! A store wrapper that reads through and records writes instead of sending them

use std::sync::Mutex;

use async_trait::async_trait;

use super::error::GatewayError;
use super::operations::{Operation, OperationResult};
use super::query::Filter;
use super::store::{Document, DocumentStore};

pub struct DryRunStore<'a> {
    inner: &'a dyn DocumentStore,
    recorded: Mutex<Vec<Operation>>,
}

impl<'a> DryRunStore<'a> {
    pub fn new(inner: &'a dyn DocumentStore) -> Self {
        Self {
            inner,
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Writes that would have been sent, in order
    pub fn recorded(&self) -> Vec<Operation> {
        self.recorded
            .lock()
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for DryRunStore<'_> {
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, GatewayError> {
        self.inner.list_documents(collection, filters).await
    }

    async fn execute(&self, operation: &Operation) -> Result<OperationResult, GatewayError> {
        let mut recorded = self
            .recorded
            .lock()
            .map_err(|_| GatewayError::InvalidResponse("dry-run log poisoned".to_string()))?;
        recorded.push(operation.clone());

        let document_id = match operation {
            Operation::Update { id, .. } => id.clone(),
            Operation::Create { .. } => format!("dry-run-{}", recorded.len()),
        };
        log::info!(
            "[dry-run] {} {} {}",
            operation.operation_type(),
            operation.collection(),
            operation.data()
        );

        Ok(OperationResult::new(operation.clone(), document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_reads_pass_through_and_writes_are_recorded() {
        let memory = MemoryStore::new();
        let room_id = memory.seed("rooms", json!({"room_number": "101"}));
        let dry_run = DryRunStore::new(&memory);

        let found = dry_run
            .list_documents("rooms", &[Filter::equal("room_number", "101")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let result = dry_run
            .execute(&Operation::update("rooms", &room_id, json!({"occupied_seats": 0})))
            .await
            .unwrap();
        assert_eq!(result.document_id, room_id);

        let created = dry_run
            .execute(&Operation::create("management_costs", json!({})))
            .await
            .unwrap();
        assert_eq!(created.document_id, "dry-run-2");

        assert_eq!(dry_run.recorded().len(), 2);
        // Nothing reached the real store
        assert!(memory.operations().is_empty());
        assert!(memory.documents("management_costs").is_empty());
    }
}
