use nnews_shared::{NewsError, NewsResult, Tag, TagInput, TagUpdate};
use reqwest::Method;

use super::endpoints;
use crate::http::HttpClient;

/// Tag endpoints.
#[derive(Clone)]
pub struct TagApi {
    http: HttpClient,
}

impl TagApi {
    /// Client over a shared [`HttpClient`].
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
        }
    }

    /// `GET /tag`.
    pub async fn list_tags(&self) -> NewsResult<Vec<Tag>> {
        self.http.get(endpoints::TAGS, Vec::new()).await
    }

    /// `GET /tag/{id}`.
    pub async fn get_tag(&self, tag_id: i64) -> NewsResult<Tag> {
        self.http.get(&endpoints::tag_by_id(tag_id), Vec::new()).await
    }

    /// Validate, then `POST /tag`.
    pub async fn create_tag(&self, tag: &TagInput) -> NewsResult<Tag> {
        tag.validate()?;
        let created: Tag = self.http.send_json(Method::POST, endpoints::TAGS, tag).await?;
        tracing::info!(tag_id = ?created.tag_id, title = %created.title, "tag created");
        Ok(created)
    }

    /// Validate, then `PUT /tag`.
    pub async fn update_tag(&self, tag: &TagUpdate) -> NewsResult<Tag> {
        tag.validate()?;
        let updated = self.http.send_json(Method::PUT, endpoints::TAGS, tag).await?;
        tracing::info!(tag_id = tag.tag_id, "tag updated");
        Ok(updated)
    }

    /// `DELETE /tag/{id}`.
    pub async fn delete_tag(&self, tag_id: i64) -> NewsResult<()> {
        self.http
            .send_empty(Method::DELETE, &endpoints::tag_by_id(tag_id))
            .await?;
        tracing::info!(tag_id, "tag deleted");
        Ok(())
    }

    /// Move every article from the source tag to the target, then delete
    /// the source. Merging a tag into itself is rejected locally.
    pub async fn merge_tags(&self, source_tag_id: i64, target_tag_id: i64) -> NewsResult<()> {
        if source_tag_id == target_tag_id {
            return Err(NewsError::validation("Cannot merge a tag into itself"));
        }
        self.http
            .send_empty(Method::POST, &endpoints::tag_merge(source_tag_id, target_tag_id))
            .await?;
        tracing::info!(source_tag_id, target_tag_id, "tags merged");
        Ok(())
    }
}
