//! HTTP plumbing: the [`Transport`] seam, its reqwest implementation and
//! the [`HttpClient`] that injects headers and maps statuses to errors.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use nnews_shared::{NewsError, NewsResult};
use parking_lot::RwLock;
use reqwest::{
    multipart::{Form, Part},
    Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::NewsConfig;

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";
const ERROR_BODY_PREVIEW_CHARS: usize = 500;

/// A file sent as one multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: String,
    /// File content.
    pub bytes: Bytes,
}

/// What a request carries.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A JSON document.
    Json(Value),
    /// A single file, sent as `multipart/form-data`.
    Multipart(FilePart),
}

/// One request, fully resolved except for the server origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path, e.g. `/tag/3`.
    pub path: String,
    /// Query string pairs, in order.
    pub query: Vec<(String, String)>,
    /// Headers snapshotted when the request was dispatched.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Request without query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Replace the query string.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// First query value named `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The JSON body, if there is one.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Raw response: status plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Bytes,
}

impl ApiResponse {
    /// Response with a raw body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response carrying `value` as JSON.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations report only transport failures as errors; status
/// handling belongs to [`HttpClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever the server answered, error statuses
    /// included. Only failures to get a response are errors.
    async fn execute(&self, request: ApiRequest) -> NewsResult<ApiResponse>;
}

/// [`Transport`] over a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Transport rooted at `base_url` (origin plus base path).
    pub fn new(base_url: &str, timeout: Duration) -> NewsResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|err| NewsError::validation(format!("invalid api url `{base_url}`: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NewsError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            base_url,
        })
    }

    /// Transport for `config.endpoint_base()` with `config.timeout`.
    pub fn from_config(config: &NewsConfig) -> NewsResult<Self> {
        Self::new(&config.endpoint_base(), config.timeout)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> NewsResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let is_multipart = matches!(request.body, RequestBody::Multipart(_));

        let mut builder = self.client.request(request.method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            // reqwest writes the multipart boundary itself
            if is_multipart && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|err| {
                        NewsError::validation(format!("invalid content type: {err}"))
                    })?;
                builder.multipart(Form::new().part(file.field, part))
            },
        };

        let response = builder
            .send()
            .await
            .map_err(|err| NewsError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| NewsError::Network(format!("failed to read response body: {err}")))?;
        Ok(ApiResponse {
            status,
            body,
        })
    }
}

/// Shared HTTP client: one per [`NewsContext`](crate::NewsContext).
///
/// Cloning is cheap and every clone sees the same header set. Headers are
/// read when a request is dispatched, so a token set before dispatch is
/// picked up while requests already in flight keep the headers they were
/// sent with.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    headers: Arc<RwLock<Vec<(String, String)>>>,
}

impl HttpClient {
    /// Client over `transport`, starting with a JSON content type plus
    /// `headers`.
    pub fn new(transport: Arc<dyn Transport>, headers: Vec<(String, String)>) -> Self {
        let client = Self {
            transport,
            headers: Arc::new(RwLock::new(vec![(
                CONTENT_TYPE.to_string(),
                "application/json".to_string(),
            )])),
        };
        for (name, value) in headers {
            client.set_header(name, value);
        }
        client
    }

    /// Set a header, replacing one with the same case-insensitive name.
    pub fn set_header(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let mut headers = self.headers.write();
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        headers.push((name, value.into()));
    }

    /// Drop a header by case-insensitive name.
    pub fn remove_header(&self, name: &str) {
        self.headers
            .write()
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    }

    /// Send `Authorization: Bearer <token>` from now on.
    pub fn set_bearer_token(&self, token: &str) {
        self.set_header(AUTHORIZATION, format!("Bearer {}", token.trim()));
    }

    /// Stop sending `Authorization`.
    pub fn clear_bearer_token(&self) {
        self.remove_header(AUTHORIZATION);
    }

    /// Current header set, blank values included.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers.read().clone()
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> NewsResult<T> {
        let response = self
            .dispatch(ApiRequest::new(Method::GET, path).with_query(query))
            .await?;
        decode(&response.body)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> NewsResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)
            .map_err(|err| NewsError::validation(format!("failed to encode request: {err}")))?;
        let response = self
            .dispatch(ApiRequest::new(method, path).with_body(RequestBody::Json(body)))
            .await?;
        decode(&response.body)
    }

    /// Send a request whose response body is ignored.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> NewsResult<()> {
        self.dispatch(ApiRequest::new(method, path)).await?;
        Ok(())
    }

    pub(crate) async fn upload(&self, path: &str, file: FilePart) -> NewsResult<Bytes> {
        let response = self
            .dispatch(ApiRequest::new(Method::POST, path).with_body(RequestBody::Multipart(file)))
            .await?;
        Ok(response.body)
    }

    async fn dispatch(&self, mut request: ApiRequest) -> NewsResult<ApiResponse> {
        request.headers = self
            .headers
            .read()
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .cloned()
            .collect();

        let method = request.method.clone();
        let path = request.path.clone();
        tracing::debug!(
            %method,
            %path,
            authorized = request.header(AUTHORIZATION).is_some(),
            "dispatching request"
        );

        let response = self.transport.execute(request).await.map_err(|err| {
            tracing::debug!(%method, %path, "request failed: {err}");
            err
        })?;
        tracing::debug!(%method, %path, status = response.status, "response received");

        if !response.is_success() {
            return Err(NewsError::Status {
                status: response.status,
                message: error_message(response.status, &response.body),
            });
        }
        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> NewsResult<T> {
    serde_json::from_slice(body).map_err(|err| NewsError::Decode(err.to_string()))
}

/// Best message a failed response offers: a JSON `message`/`title`/
/// `error`/`detail` field, a JSON string, the raw text, or the status
/// reason.
fn error_message(status: u16, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if let Some(text) = value.as_str() {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
        for key in ["message", "title", "error", "detail"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}
