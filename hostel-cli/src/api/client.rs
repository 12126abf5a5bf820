//! HTTP client for the BaaS document REST API
//!
//! Documents live under `{endpoint}/databases/{database}/collections/{collection}/documents`.
//! Requests carry the project id (and the API key when one is configured) as
//! default headers.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::error::GatewayError;
use super::operations::{Operation, OperationResult};
use super::query::Filter;
use super::store::{Document, DocumentStore};
use crate::config::BaasConfig;

/// Page size used when listing without explicit paging
const PAGE_SIZE: u32 = 100;

/// Id placeholder asking the server to assign a fresh document id
const UNIQUE_ID: &str = "unique()";

const PROJECT_HEADER: &str = "x-appwrite-project";
const KEY_HEADER: &str = "x-appwrite-key";

#[derive(Debug, Deserialize)]
struct DocumentList {
    total: u64,
    documents: Vec<Map<String, Value>>,
}

/// Document store backed by the BaaS REST API
pub struct BaasClient {
    http: reqwest::Client,
    endpoint: String,
    database_id: String,
}

impl BaasClient {
    pub fn new(config: &BaasConfig) -> Result<Self, GatewayError> {
        if config.endpoint.is_empty() {
            return Err(GatewayError::Config("endpoint is not set".to_string()));
        }
        if config.project_id.is_empty() {
            return Err(GatewayError::Config("project_id is not set".to_string()));
        }
        if config.database_id.is_empty() {
            return Err(GatewayError::Config("database_id is not set".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(PROJECT_HEADER, header_value(&config.project_id, "project_id")?);
        if !config.api_key.is_empty() {
            headers.insert(KEY_HEADER, header_value(&config.api_key, "api_key")?);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            database_id: config.database_id.clone(),
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, collection
        )
    }

    /// Send a request and decode the JSON body, mapping non-2xx answers to errors
    async fn send(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, GatewayError> {
        let response = request.send().await.map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            // Error bodies are `{"message": ..., "code": ...}` when the server sends JSON
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(GatewayError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("{} {}: {}", method, url, e)))
    }
}

#[async_trait]
impl DocumentStore for BaasClient {
    async fn list_documents(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, GatewayError> {
        let url = self.documents_url(collection);
        let explicit_paging = filters
            .iter()
            .any(|f| matches!(f, Filter::Limit(_) | Filter::Offset(_)));

        let mut documents = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let mut params: Vec<(&str, String)> = filters
                .iter()
                .map(|f| ("queries[]", f.to_query_param()))
                .collect();
            if !explicit_paging {
                params.push(("queries[]", Filter::Limit(PAGE_SIZE).to_query_param()));
                params.push(("queries[]", Filter::Offset(offset).to_query_param()));
            }

            log::debug!("GET {} params={:?}", url, params);
            let body = self
                .send("GET", &url, self.http.get(&url).query(&params))
                .await?;
            let page: DocumentList = serde_json::from_value(body)
                .map_err(|e| GatewayError::InvalidResponse(format!("GET {}: {}", url, e)))?;

            let fetched = page.documents.len();
            for fields in page.documents {
                documents.push(document_from_fields(fields)?);
            }

            log::debug!(
                "Fetched {} documents from {}, {}/{} so far",
                fetched,
                collection,
                documents.len(),
                page.total
            );

            if explicit_paging || fetched == 0 || documents.len() as u64 >= page.total {
                break;
            }
            offset += fetched as u32;
        }

        Ok(documents)
    }

    async fn execute(&self, operation: &Operation) -> Result<OperationResult, GatewayError> {
        let (url, request) = match operation {
            Operation::Create { collection, data } => {
                let url = self.documents_url(collection);
                let body = json!({"documentId": UNIQUE_ID, "data": data});
                let request = self.http.post(&url).json(&body);
                (url, request)
            }
            Operation::Update {
                collection,
                id,
                data,
            } => {
                let url = format!("{}/{}", self.documents_url(collection), id);
                let request = self.http.patch(&url).json(&json!({"data": data}));
                (url, request)
            }
        };

        log::debug!(
            "{} {} ({} in {})",
            operation.http_method(),
            url,
            operation.operation_type(),
            operation.collection()
        );
        let body = self.send(operation.http_method(), &url, request).await?;

        let document_id = body
            .get("$id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!("{} {}: missing $id", operation.http_method(), url))
            })?;

        Ok(OperationResult::new(operation.clone(), document_id))
    }
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue, GatewayError> {
    HeaderValue::from_str(value)
        .map_err(|e| GatewayError::Config(format!("invalid {}: {}", name, e)))
}

/// Split the server's `$id` out of a raw document
fn document_from_fields(mut fields: Map<String, Value>) -> Result<Document, GatewayError> {
    match fields.remove("$id") {
        Some(Value::String(id)) => Ok(Document::new(id, fields)),
        _ => Err(GatewayError::InvalidResponse(
            "document without $id".to_string(),
        )),
    }
}
