use nnews_shared::{
    pagination::matches_search, Category, CategoryInput, CategoryQuery, CategoryUpdate, NewsError,
    NewsResult,
};

use super::StoreCore;
use crate::api::CategoryApi;

/// Category list with loading/error state.
#[derive(Clone)]
pub struct CategoryStore {
    api: CategoryApi,
    core: StoreCore<Vec<Category>, CategoryQuery>,
}

impl CategoryStore {
    /// Empty store over `api`.
    pub fn new(api: CategoryApi) -> Self {
        Self {
            api,
            core: StoreCore::new(),
        }
    }

    /// Load categories. Roles or a parent id go through the filter
    /// endpoint; the search term is matched against titles locally.
    pub async fn fetch(&self, query: CategoryQuery) -> NewsResult<Vec<Category>> {
        let load = async {
            let categories = if !query.roles.is_empty() {
                self.api.filter_categories(&query.roles, query.parent_id).await?
            } else if query.parent_id.is_some() {
                self.api.filter_categories(&[], query.parent_id).await?
            } else {
                self.api.list_categories().await?
            };
            Ok(match query.search_term.as_deref() {
                Some(term) => categories
                    .into_iter()
                    .filter(|category| matches_search([category.title.as_str()], term))
                    .collect(),
                None => categories,
            })
        };
        self.core.fetch("categories", query.clone(), load).await
    }

    /// Load one category without touching the list.
    pub async fn get_by_id(&self, category_id: i64) -> NewsResult<Category> {
        self.core.run(self.api.get_category(category_id)).await
    }

    /// Create, then reload the list.
    pub async fn create(&self, category: &CategoryInput) -> NewsResult<Category> {
        self.core
            .run(async {
                let created = self.api.create_category(category).await?;
                self.refresh().await?;
                Ok(created)
            })
            .await
    }

    /// Update, then reload the list.
    pub async fn update(&self, category: &CategoryUpdate) -> NewsResult<Category> {
        self.core
            .run(async {
                let updated = self.api.update_category(category).await?;
                self.refresh().await?;
                Ok(updated)
            })
            .await
    }

    /// Delete, then reload the list.
    pub async fn delete(&self, category_id: i64) -> NewsResult<()> {
        self.core
            .run(async {
                self.api.delete_category(category_id).await?;
                self.refresh().await
            })
            .await
    }

    /// Re-run the last fetch, or load everything when nothing was fetched
    /// yet. Mutations call this too.
    pub async fn refresh(&self) -> NewsResult<()> {
        let query = self.core.last_params().unwrap_or_default();
        self.fetch(query).await.map(drop)
    }

    /// Last list loaded.
    pub fn categories(&self) -> Vec<Category> {
        self.core.data().unwrap_or_default()
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
    pub fn last_params(&self) -> Option<CategoryQuery> {
        self.core.last_params()
    }
}
