//! Core Operation types for document writes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a single write that can be executed against the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new document
    Create {
        /// Collection id (e.g., "rooms", "management_costs")
        collection: String,
        /// Document fields as a JSON object
        data: Value,
    },
    /// Update fields of an existing document
    Update {
        /// Collection id
        collection: String,
        /// Document id
        id: String,
        /// Fields to overwrite as a JSON object
        data: Value,
    },
}

/// Result of executing an Operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// The operation that was executed
    pub operation: Operation,
    /// Id of the created or updated document
    pub document_id: String,
}

impl Operation {
    /// Create a new Create operation
    pub fn create(collection: impl Into<String>, data: Value) -> Self {
        Self::Create {
            collection: collection.into(),
            data,
        }
    }

    /// Create a new Update operation
    pub fn update(collection: impl Into<String>, id: impl Into<String>, data: Value) -> Self {
        Self::Update {
            collection: collection.into(),
            id: id.into(),
            data,
        }
    }

    /// Get the collection this operation targets
    pub fn collection(&self) -> &str {
        match self {
            Self::Create { collection, .. } => collection,
            Self::Update { collection, .. } => collection,
        }
    }

    /// Get the document fields carried by this operation
    pub fn data(&self) -> &Value {
        match self {
            Self::Create { data, .. } => data,
            Self::Update { data, .. } => data,
        }
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> &'static str {
        match self {
            Self::Create { .. } => "POST",
            Self::Update { .. } => "PATCH",
        }
    }

    /// Get the operation type as a string
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create { collection, data } => write!(f, "create {} {}", collection, data),
            Self::Update {
                collection,
                id,
                data,
            } => write!(f, "update {}/{} {}", collection, id, data),
        }
    }
}

impl OperationResult {
    pub fn new(operation: Operation, document_id: impl Into<String>) -> Self {
        Self {
            operation,
            document_id: document_id.into(),
        }
    }
}
