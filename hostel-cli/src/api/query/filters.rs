//! Filter expressions for document listing

use serde_json::{Map, Value, json};

/// A single list-query clause
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Attribute equals value
    Equal { attribute: String, value: Value },
    /// Maximum number of documents in one page
    Limit(u32),
    /// Number of documents to skip
    Offset(u32),
}

impl Filter {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Encode as a `queries[]` parameter value
    pub fn to_query_param(&self) -> String {
        let query = match self {
            Self::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Self::Limit(limit) => json!({"method": "limit", "values": [limit]}),
            Self::Offset(offset) => json!({"method": "offset", "values": [offset]}),
        };
        query.to_string()
    }

    /// Whether a document's fields satisfy this clause.
    ///
    /// Paging clauses always match; they are applied to the result list.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        match self {
            Self::Equal { attribute, value } => fields.get(attribute) == Some(value),
            Self::Limit(_) | Self::Offset(_) => true,
        }
    }
}
