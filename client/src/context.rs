//! The context object tying configuration, HTTP client and APIs together.

use std::sync::Arc;

use nnews_shared::NewsResult;

use crate::{
    api::{ArticleApi, CategoryApi, TagApi},
    config::NewsConfig,
    http::{HttpClient, ReqwestTransport, Transport},
    store::{ArticleStore, CategoryStore, TagStore},
};

/// Entry point: one configured HTTP client plus the three resource APIs
/// that share it.
///
/// Contexts are cheap to clone; clones share headers and connections.
/// Stores handed out by a context talk to its APIs and keep their own
/// state.
#[derive(Clone)]
pub struct NewsContext {
    config: Arc<NewsConfig>,
    http: HttpClient,
    articles: ArticleApi,
    categories: CategoryApi,
    tags: TagApi,
}

impl NewsContext {
    /// Build a context that talks to `config.api_url` over reqwest.
    pub fn new(config: NewsConfig) -> NewsResult<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a context over any [`Transport`]. Request paths handed to the
    /// transport are relative to `config.endpoint_base()`.
    pub fn with_transport(config: NewsConfig, transport: Arc<dyn Transport>) -> Self {
        let http = HttpClient::new(transport, config.headers.clone());
        tracing::debug!(endpoint = %config.endpoint_base(), "news context ready");
        Self {
            config: Arc::new(config),
            articles: ArticleApi::new(http.clone()),
            categories: CategoryApi::new(http.clone()),
            tags: TagApi::new(http.clone()),
            http,
        }
    }

    /// Settings the context was built from.
    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// The shared HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Article endpoints.
    pub fn article_api(&self) -> &ArticleApi {
        &self.articles
    }

    /// Category endpoints.
    pub fn category_api(&self) -> &CategoryApi {
        &self.categories
    }

    /// Tag endpoints.
    pub fn tag_api(&self) -> &TagApi {
        &self.tags
    }

    /// A fresh article store over this context's API.
    pub fn article_store(&self) -> ArticleStore {
        ArticleStore::new(self.articles.clone())
    }

    /// A fresh category store over this context's API.
    pub fn category_store(&self) -> CategoryStore {
        CategoryStore::new(self.categories.clone())
    }

    /// A fresh tag store over this context's API.
    pub fn tag_store(&self) -> TagStore {
        TagStore::new(self.tags.clone())
    }

    /// Send `Authorization: Bearer <token>` on every request dispatched
    /// from now on.
    pub fn set_bearer_token(&self, token: &str) {
        self.http.set_bearer_token(token);
    }

    /// Stop sending `Authorization`.
    pub fn clear_bearer_token(&self) {
        self.http.clear_bearer_token();
    }
}
