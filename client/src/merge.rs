//! Tag merge dialog state.

use nnews_shared::{NewsError, NewsResult, Tag};

use crate::store::TagStore;

/// State of a "merge tags" dialog: every article tagged with the source
/// is moved to the chosen target and the source is deleted.
#[derive(Debug, Clone)]
pub struct TagMerge {
    source: Tag,
    available: Vec<Tag>,
    target_tag_id: Option<i64>,
    error: Option<String>,
}

impl TagMerge {
    /// Dialog for merging `source` into one of `available`.
    pub fn new(source: Tag, available: Vec<Tag>) -> Self {
        Self {
            source,
            available,
            target_tag_id: None,
            error: None,
        }
    }

    /// Tag being merged away.
    pub fn source(&self) -> &Tag {
        &self.source
    }

    /// Candidate targets: every available tag except the source.
    pub fn selectable_tags(&self) -> Vec<&Tag> {
        self.available
            .iter()
            .filter(|tag| tag.tag_id != self.source.tag_id)
            .collect()
    }

    /// Pick the target, or clear it with `None`.
    pub fn select_target(&mut self, target_tag_id: Option<i64>) {
        self.target_tag_id = target_tag_id;
    }

    /// Chosen target.
    pub fn target_tag_id(&self) -> Option<i64> {
        self.target_tag_id
    }

    /// Message of the last failed validation or merge.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check the selection and return `(source_id, target_id)`.
    pub fn validate(&mut self) -> NewsResult<(i64, i64)> {
        let result = self.checked_ids();
        self.error = result.as_ref().err().map(|err| err.message().to_string());
        result
    }

    /// Merge through `store`, which reloads its tag list afterwards. The
    /// selection is cleared on success and kept on failure.
    pub async fn submit(&mut self, store: &TagStore) -> NewsResult<()> {
        let (source_tag_id, target_tag_id) = self.validate()?;
        match store.merge_tags(source_tag_id, target_tag_id).await {
            Ok(()) => {
                self.reset();
                Ok(())
            },
            Err(err) => {
                tracing::warn!(source_tag_id, target_tag_id, "failed to merge tags: {err}");
                self.error = Some(err.message().to_string());
                Err(err)
            },
        }
    }

    /// Clear the selection and errors, as closing the dialog does.
    pub fn reset(&mut self) {
        self.target_tag_id = None;
        self.error = None;
    }

    fn checked_ids(&self) -> NewsResult<(i64, i64)> {
        let target_tag_id = self
            .target_tag_id
            .filter(|id| *id != 0)
            .ok_or_else(|| NewsError::validation("Please select a target tag"))?;
        let source_tag_id = self
            .source
            .tag_id
            .ok_or_else(|| NewsError::validation("Source tag has not been saved"))?;
        if source_tag_id == target_tag_id {
            return Err(NewsError::validation("Cannot merge a tag into itself"));
        }
        Ok((source_tag_id, target_tag_id))
    }
}
