//! In-memory document store for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::GatewayError;
use super::operations::{Operation, OperationResult};
use super::query::Filter;
use super::store::{Document, DocumentStore};

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Document>>,
    operations: Vec<Operation>,
    next_id: usize,
    fail_at: Option<usize>,
}

impl State {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("doc-{}", self.next_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document directly, without logging an operation
    pub fn seed(&self, collection: &str, data: Value) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.fresh_id();
        let fields = as_object(data);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        id
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        let state = self.state.lock().unwrap();
        state.collections.get(collection).cloned().unwrap_or_default()
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.documents(collection).into_iter().find(|d| d.id == id)
    }

    /// Make the write with this index (counting from 0) fail with a server
    /// error. Later writes go through again.
    pub fn fail_on(&self, index: usize) {
        self.state.lock().unwrap().fail_at = Some(index);
    }

    /// Every executed write, in order
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }
}

fn as_object(data: Value) -> Map<String, Value> {
    match data {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, GatewayError> {
        let state = self.state.lock().unwrap();
        let matching = state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filters.iter().all(|f| f.matches(&doc.fields)))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let offset = filters
            .iter()
            .find_map(|f| match f {
                Filter::Offset(n) => Some(*n as usize),
                _ => None,
            })
            .unwrap_or(0);
        let limit = filters
            .iter()
            .find_map(|f| match f {
                Filter::Limit(n) => Some(*n as usize),
                _ => None,
            })
            .unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn execute(&self, operation: &Operation) -> Result<OperationResult, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_at == Some(state.operations.len()) {
            state.fail_at = None;
            return Err(GatewayError::Status {
                method: operation.http_method(),
                url: operation.collection().to_string(),
                status: 500,
                message: "Server Error".to_string(),
            });
        }
        state.operations.push(operation.clone());

        match operation {
            Operation::Create { collection, data } => {
                let id = state.fresh_id();
                state
                    .collections
                    .entry(collection.clone())
                    .or_default()
                    .push(Document::new(id.clone(), as_object(data.clone())));
                Ok(OperationResult::new(operation.clone(), id))
            }
            Operation::Update {
                collection,
                id,
                data,
            } => {
                let document = state
                    .collections
                    .get_mut(collection)
                    .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
                    .ok_or_else(|| GatewayError::Status {
                        method: operation.http_method(),
                        url: format!("{}/{}", collection, id),
                        status: 404,
                        message: "Document with the requested ID could not be found.".to_string(),
                    })?;
                for (key, value) in as_object(data.clone()) {
                    document.fields.insert(key, value);
                }
                Ok(OperationResult::new(operation.clone(), id.clone()))
            }
        }
    }
}
