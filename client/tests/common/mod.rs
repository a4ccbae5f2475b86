#![allow(dead_code, reason = "each test binary uses a different subset of the helpers")]

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use nnews_client::{ApiRequest, ApiResponse, NewsConfig, NewsContext, Transport};
use nnews_shared::{NewsError, NewsResult, Tag};
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{json, Value};

type Handler = Box<dyn Fn(ApiRequest) -> BoxFuture<'static, NewsResult<ApiResponse>> + Send + Sync>;

/// In-memory transport that records every request it executes.
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    handler: Handler,
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> NewsResult<ApiResponse> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Self::with_async(move |request| future::ready(handler(&request)).boxed())
    }

    pub fn with_async(
        handler: impl Fn(ApiRequest) -> BoxFuture<'static, NewsResult<ApiResponse>>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> NewsResult<ApiResponse> {
        self.requests.lock().push(request.clone());
        (self.handler)(request).await
    }
}

pub fn context(transport: Arc<MockTransport>) -> NewsContext {
    NewsContext::with_transport(NewsConfig::default(), transport)
}

pub fn ok(value: Value) -> NewsResult<ApiResponse> {
    Ok(ApiResponse::json(200, &value))
}

pub fn status(code: u16, value: Value) -> NewsResult<ApiResponse> {
    Ok(ApiResponse::json(code, &value))
}

pub fn not_found() -> NewsResult<ApiResponse> {
    Ok(ApiResponse::new(404, ""))
}

pub fn article_json(article_id: i64, title: &str) -> Value {
    json!({
        "articleId": article_id,
        "categoryId": 1,
        "title": title,
        "content": "<p>Body</p>",
        "status": 1,
        "dateAt": "2024-01-01T00:00:00Z",
        "createdAt": "2024-01-01T08:30:00",
        "updatedAt": null,
        "tags": [],
        "roles": []
    })
}

pub fn paged(items: Vec<Value>, page: u32, page_size: u32, total_count: u64) -> Value {
    let total_pages = total_count.div_ceil(u64::from(page_size.max(1)));
    json!({
        "items": items,
        "page": page,
        "pageSize": page_size,
        "totalCount": total_count,
        "totalPages": total_pages,
        "hasPrevious": page > 1,
        "hasNext": u64::from(page) < total_pages
    })
}

/// A small tag backend: list, get, create, update, delete and merge.
#[derive(Default)]
pub struct TagServer {
    tags: Mutex<Vec<Tag>>,
    next_id: Mutex<i64>,
}

impl TagServer {
    pub fn with_tags(titles: &[&str]) -> Arc<Self> {
        let server = Arc::new(Self::default());
        for title in titles {
            server.insert(title);
        }
        server
    }

    pub fn titles(&self) -> Vec<String> {
        self.tags.lock().iter().map(|tag| tag.title.clone()).collect()
    }

    pub fn transport(self: &Arc<Self>) -> Arc<MockTransport> {
        let server = Arc::clone(self);
        MockTransport::new(move |request| server.handle(request))
    }

    fn insert(&self, title: &str) -> Tag {
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let tag = Tag {
            tag_id: Some(*next_id),
            title: title.to_string(),
            slug: Some(title.to_lowercase().replace(' ', "-")),
            article_count: Some(0),
        };
        self.tags.lock().push(tag.clone());
        tag
    }

    fn handle(&self, request: &ApiRequest) -> NewsResult<ApiResponse> {
        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["tag"]) => ok(json!(*self.tags.lock())),
            ("GET", ["tag", id]) => match self.find(id) {
                Some(tag) => ok(json!(tag)),
                None => not_found(),
            },
            ("POST", ["tag"]) => {
                let title = body_title(request)?;
                if self.tags.lock().iter().any(|tag| tag.title == title) {
                    return status(400, json!({"message": "Tag already exists"}));
                }
                ok(json!(self.insert(&title)))
            },
            ("PUT", ["tag"]) => {
                let title = body_title(request)?;
                let tag_id = request
                    .json_body()
                    .and_then(|body| body["tagId"].as_i64())
                    .unwrap_or_default();
                let mut tags = self.tags.lock();
                match tags.iter_mut().find(|tag| tag.tag_id == Some(tag_id)) {
                    Some(tag) => {
                        tag.title = title;
                        ok(json!(tag))
                    },
                    None => not_found(),
                }
            },
            ("DELETE", ["tag", id]) => {
                let id = id.parse::<i64>().ok();
                let mut tags = self.tags.lock();
                let before = tags.len();
                tags.retain(|tag| tag.tag_id != id);
                if tags.len() == before {
                    return not_found();
                }
                Ok(ApiResponse::new(204, ""))
            },
            ("POST", ["Tag", "merge", source, _target]) => {
                let source = source.parse::<i64>().ok();
                self.tags.lock().retain(|tag| tag.tag_id != source);
                Ok(ApiResponse::new(200, ""))
            },
            _ => not_found(),
        }
    }

    fn find(&self, id: &str) -> Option<Tag> {
        let id = id.parse::<i64>().ok()?;
        self.tags
            .lock()
            .iter()
            .find(|tag| tag.tag_id == Some(id))
            .cloned()
    }
}

fn body_title(request: &ApiRequest) -> NewsResult<String> {
    request
        .json_body()
        .and_then(|body| body["title"].as_str())
        .map(str::to_string)
        .ok_or_else(|| NewsError::Decode("missing title".to_string()))
}
