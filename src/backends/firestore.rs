//! Firestore document store
//!
//! Uses the Firestore REST API (v1). Documents travel as typed JSON values
//! (`{"stringValue": ...}`, `{"integerValue": "..."}` and so on), which this
//! module encodes and decodes to [`FieldValue`].

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::firebase::TokenHandle;
use super::{BackendError, BackendResult, DocumentStore};
use crate::document::{Document, FieldValue};
use crate::entities::GeoPoint;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const LIST_PAGE_SIZE: u32 = 300;

/// Encode one value into Firestore's typed JSON form
pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(ts) => json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::AutoSi, true) }),
        FieldValue::GeoPoint(p) => json!({ "geoPointValue": { "latitude": p.lat, "longitude": p.lng } }),
        FieldValue::Array(values) => {
            json!({ "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        FieldValue::Map(doc) => json!({ "mapValue": { "fields": encode_fields(doc) } }),
    }
}

/// Encode a document's fields as a `fields` object
pub fn encode_fields(doc: &Document) -> Value {
    Value::Object(
        doc.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect::<Map<String, Value>>(),
    )
}

/// Decode one typed JSON value
pub fn decode_value(value: &Value) -> BackendResult<FieldValue> {
    let obj = value
        .as_object()
        .ok_or_else(|| BackendError::Decode(format!("expected typed value object, got {value}")))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| BackendError::Decode("empty typed value".to_string()))?;

    let bad = |expected: &str| BackendError::Decode(format!("{kind}: expected {expected}, got {inner}"));

    match kind.as_str() {
        "nullValue" => Ok(FieldValue::Null),
        "booleanValue" => inner.as_bool().map(FieldValue::Boolean).ok_or_else(|| bad("bool")),
        // int64 values are sent as strings to survive JSON number precision
        "integerValue" => match inner {
            Value::String(s) => s.parse().map(FieldValue::Integer).map_err(|_| bad("integer")),
            Value::Number(n) => n.as_i64().map(FieldValue::Integer).ok_or_else(|| bad("integer")),
            _ => Err(bad("integer")),
        },
        "doubleValue" => match inner {
            Value::Number(n) => n.as_f64().map(FieldValue::Double).ok_or_else(|| bad("double")),
            Value::String(s) => s.parse().map(FieldValue::Double).map_err(|_| bad("double")),
            _ => Err(bad("double")),
        },
        "stringValue" | "referenceValue" => inner
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(|| bad("string")),
        "timestampValue" => inner
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| FieldValue::Timestamp(dt.with_timezone(&Utc)))
            .ok_or_else(|| bad("RFC 3339 timestamp")),
        "geoPointValue" => {
            let lat = inner.get("latitude").and_then(Value::as_f64).unwrap_or(0.0);
            let lng = inner.get("longitude").and_then(Value::as_f64).unwrap_or(0.0);
            Ok(FieldValue::GeoPoint(GeoPoint::new(lat, lng)))
        }
        "arrayValue" => match inner.get("values") {
            None => Ok(FieldValue::Array(Vec::new())),
            Some(Value::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<BackendResult<Vec<_>>>()
                .map(FieldValue::Array),
            Some(_) => Err(bad("values array")),
        },
        "mapValue" => match inner.get("fields") {
            None => Ok(FieldValue::Map(Document::new())),
            Some(fields) => decode_fields(fields).map(FieldValue::Map),
        },
        other => Err(BackendError::Decode(format!("unsupported value type '{other}'"))),
    }
}

/// Decode a `fields` object into a document
pub fn decode_fields(fields: &Value) -> BackendResult<Document> {
    let obj = fields
        .as_object()
        .ok_or_else(|| BackendError::Decode("fields is not an object".to_string()))?;
    obj.iter()
        .map(|(k, v)| decode_value(v).map(|fv| (k.clone(), fv)))
        .collect()
}

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

impl RawDocument {
    /// The id is the last segment of the resource name.
    fn into_entry(self) -> BackendResult<(String, Document)> {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        let doc = match self.fields {
            Some(fields) => decode_fields(&fields)?,
            None => Document::new(),
        };
        Ok((id, doc))
    }
}

/// Document store backed by Cloud Firestore
pub struct FirestoreClient {
    client: Client,
    documents_url: String,
    token: TokenHandle,
}

impl FirestoreClient {
    pub fn new(project_id: &str, token: TokenHandle) -> BackendResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            documents_url: format!("{}/projects/{}/databases/(default)/documents", FIRESTORE_URL, project_id),
            token,
        })
    }

    fn url(&self, collection: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.documents_url, collection, id),
            None => format!("{}/{}", self.documents_url, collection),
        }
    }

    /// Send an authorised request. A 401 on a signed-in session refreshes the
    /// ID token and retries once.
    async fn send<F>(&self, build: F) -> BackendResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let token = self.token.bearer().await?;
        let resp = with_bearer(build(&self.client), token.as_deref()).send().await?;
        if resp.status() != StatusCode::UNAUTHORIZED || token.is_none() {
            return Ok(resp);
        }

        log::info!("ID token rejected, refreshing and retrying");
        let fresh = self.token.refresh().await?;
        Ok(with_bearer(build(&self.client), Some(&fresh)).send().await?)
    }
}

fn with_bearer(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => req.bearer_auth(token),
        None => req,
    }
}

fn status_error(status: StatusCode, what: &str) -> BackendError {
    match status {
        StatusCode::NOT_FOUND => BackendError::NotFound(what.to_string()),
        StatusCode::UNAUTHORIZED => BackendError::NotAuthenticated,
        StatusCode::FORBIDDEN => BackendError::PermissionDenied(what.to_string()),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            BackendError::Unavailable(format!("{what} → {status}"))
        }
        _ => BackendError::Request(format!("{what} → {status}")),
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get_document(&self, collection: &str, id: &str) -> BackendResult<Option<Document>> {
        let url = self.url(collection, Some(id));
        let resp = self.send(|client| client.get(url.as_str())).await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let raw: RawDocument = resp.json().await?;
                raw.into_entry().map(|(_, doc)| Some(doc))
            }
            status => Err(status_error(status, &format!("GET {collection}/{id}"))),
        }
    }

    async fn set_document(&self, collection: &str, id: &str, document: &Document) -> BackendResult<()> {
        // PATCH without an update mask replaces the whole document
        let url = self.url(collection, Some(id));
        let body = json!({ "fields": encode_fields(document) });
        let resp = self.send(|client| client.patch(url.as_str()).json(&body)).await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), &format!("PATCH {collection}/{id}")));
        }
        Ok(())
    }

    async fn add_document(&self, collection: &str, document: &Document) -> BackendResult<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let url = self.url(collection, None);
        let body = json!({ "fields": encode_fields(document) });
        let resp = self
            .send(|client| {
                client
                    .post(url.as_str())
                    .query(&[("documentId", id.as_str())])
                    .json(&body)
            })
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), &format!("POST {collection}")));
        }
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> BackendResult<Vec<(String, Document)>> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        let url = self.url(collection, None);
        loop {
            let resp = self
                .send(|client| {
                    let req = client
                        .get(url.as_str())
                        .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
                    match &page_token {
                        Some(token) => req.query(&[("pageToken", token.as_str())]),
                        None => req,
                    }
                })
                .await?;
            if !resp.status().is_success() {
                return Err(status_error(resp.status(), &format!("GET {collection}")));
            }
            let page: ListResponse = resp.json().await?;
            for raw in page.documents {
                entries.push(raw.into_entry()?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        log::debug!("Listed {} documents from {}", entries.len(), collection);
        Ok(entries)
    }
}
