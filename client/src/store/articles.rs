use nnews_shared::{
    Article, ArticleInput, ArticleQuery, ArticleUpdate, NewsError, NewsResult, PagedResult,
};

use super::StoreCore;
use crate::api::ArticleApi;

/// Paged article list with loading/error state.
#[derive(Clone)]
pub struct ArticleStore {
    api: ArticleApi,
    core: StoreCore<PagedResult<Article>, ArticleQuery>,
}

impl ArticleStore {
    /// Empty store over `api`.
    pub fn new(api: ArticleApi) -> Self {
        Self {
            api,
            core: StoreCore::new(),
        }
    }

    /// Load one page. A query with roles goes through the filter endpoint
    /// and sends its category as the parent category.
    pub async fn fetch(&self, query: ArticleQuery) -> NewsResult<PagedResult<Article>> {
        let page = query.effective_page();
        let page_size = query.effective_page_size();
        let load = async {
            if query.roles.is_empty() {
                self.api.list_articles(query.category_id, page, page_size).await
            } else {
                self.api
                    .filter_articles(&query.roles, query.category_id, page, page_size)
                    .await
            }
        };
        self.core.fetch("articles", query.clone(), load).await
    }

    /// Same query as the last fetch, on another page.
    pub async fn fetch_page(&self, page: u32) -> NewsResult<PagedResult<Article>> {
        let query = ArticleQuery {
            page: Some(page),
            ..self.core.last_params().unwrap_or_default()
        };
        self.fetch(query).await
    }

    /// Load one article without touching the list.
    pub async fn get_by_id(&self, article_id: i64) -> NewsResult<Article> {
        self.core.run(self.api.get_article(article_id)).await
    }

    /// Create, then reload the current page if one was fetched.
    pub async fn create(&self, article: &ArticleInput) -> NewsResult<Article> {
        self.core
            .run(async {
                let created = self.api.create_article(article).await?;
                self.refresh().await?;
                Ok(created)
            })
            .await
    }

    /// Update, then reload the current page if one was fetched.
    pub async fn update(&self, article: &ArticleUpdate) -> NewsResult<Article> {
        self.core
            .run(async {
                let updated = self.api.update_article(article).await?;
                self.refresh().await?;
                Ok(updated)
            })
            .await
    }

    /// Delete, then reload the current page if one was fetched.
    pub async fn delete(&self, article_id: i64) -> NewsResult<()> {
        self.core
            .run(async {
                self.api.delete_article(article_id).await?;
                self.refresh().await
            })
            .await
    }

    /// Re-run the last fetch. Does nothing before the first fetch.
    pub async fn refresh(&self) -> NewsResult<()> {
        match self.core.last_params() {
            Some(query) => self.fetch(query).await.map(drop),
            None => Ok(()),
        }
    }

    /// Last page loaded.
    pub fn articles(&self) -> Option<PagedResult<Article>> {
        self.core.data()
    }

    /// True while any operation runs.
    pub fn loading(&self) -> bool {
        self.core.loading()
    }

    /// Error of the last failed operation.
    pub fn error(&self) -> Option<NewsError> {
        self.core.error()
    }

    /// Query of the last fetch.
    pub fn last_params(&self) -> Option<ArticleQuery> {
        self.core.last_params()
    }

    /// The underlying API, for calls that do not touch the list.
    pub fn api(&self) -> &ArticleApi {
        &self.api
    }
}
