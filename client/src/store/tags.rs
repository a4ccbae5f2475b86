use nnews_shared::{
    pagination::matches_search, NewsError, NewsResult, Tag, TagInput, TagQuery, TagUpdate,
};

use super::StoreCore;
use crate::api::TagApi;

/// Tag list with loading/error state.
#[derive(Clone)]
pub struct TagStore {
    api: TagApi,
    core: StoreCore<Vec<Tag>, TagQuery>,
}

impl TagStore {
    /// Empty store over `api`.
    pub fn new(api: TagApi) -> Self {
        Self {
            api,
            core: StoreCore::new(),
        }
    }

    /// Load every tag, keeping those whose title or slug matches the search
    /// term.
    pub async fn fetch(&self, query: TagQuery) -> NewsResult<Vec<Tag>> {
        let load = async {
            let tags = self.api.list_tags().await?;
            Ok(match query.search_term.as_deref() {
                Some(term) => tags
                    .into_iter()
                    .filter(|tag| {
                        matches_search([tag.title.as_str(), tag.slug.as_deref().unwrap_or("")], term)
                    })
                    .collect(),
                None => tags,
            })
        };
        self.core.fetch("tags", query.clone(), load).await
    }

    /// Load one tag without touching the list.
    pub async fn get_by_id(&self, tag_id: i64) -> NewsResult<Tag> {
        self.core.run(self.api.get_tag(tag_id)).await
    }

    /// Create, then reload the list.
    pub async fn create(&self, tag: &TagInput) -> NewsResult<Tag> {
        self.core
            .run(async {
                let created = self.api.create_tag(tag).await?;
                self.refresh().await?;
                Ok(created)
            })
            .await
    }

    /// Update, then reload the list.
    pub async fn update(&self, tag: &TagUpdate) -> NewsResult<Tag> {
        self.core
            .run(async {
                let updated = self.api.update_tag(tag).await?;
                self.refresh().await?;
                Ok(updated)
            })
            .await
    }

    /// Delete, then reload the list.
    pub async fn delete(&self, tag_id: i64) -> NewsResult<()> {
        self.core
            .run(async {
                self.api.delete_tag(tag_id).await?;
                self.refresh().await
            })
            .await
    }

    /// Fold the source tag into the target, then reload.
    pub async fn merge_tags(&self, source_tag_id: i64, target_tag_id: i64) -> NewsResult<()> {
        self.core
            .run(async {
                self.api.merge_tags(source_tag_id, target_tag_id).await?;
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
    pub fn tags(&self) -> Vec<Tag> {
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
    pub fn last_params(&self) -> Option<TagQuery> {
        self.core.last_params()
    }
}
