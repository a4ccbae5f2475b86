//! Form model behind the article editor.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nnews_shared::{
    validators::{tags_to_string, validate_tag_list},
    Article, ArticleInput, ArticleStatus, ArticleUpdate, NewsError, NewsResult,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ArticleApi, ImageUpload},
    store::ArticleStore,
};

/// A role offered in the visibility picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOption {
    /// Identity service id.
    pub role_id: i64,
    /// Slug sent in article payloads.
    pub slug: String,
    /// Display name.
    pub name: String,
}

/// Where the editor gets its role options from. Roles live outside the
/// news API, usually in the identity service.
#[async_trait]
pub trait RoleSource: Send + Sync {
    /// Every role an article can be restricted to.
    async fn fetch_roles(&self) -> NewsResult<Vec<RoleOption>>;
}

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditorField {
    /// Headline.
    Title,
    /// Body.
    Content,
    /// Comma separated tags.
    TagList,
    /// Cover image upload.
    Image,
}

/// What saving the form sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSubmission {
    /// New article.
    Create(ArticleInput),
    /// Existing article.
    Update(ArticleUpdate),
}

/// Editable article form.
///
/// Field errors are kept per [`EditorField`] so a UI can show each next to
/// its input.
#[derive(Debug, Clone, Default)]
pub struct ArticleEditor {
    article_id: Option<i64>,
    /// Headline.
    pub title: String,
    /// Body.
    pub content: String,
    /// Publication status.
    pub status: ArticleStatus,
    /// Category, `None` or `0` for none.
    pub category_id: Option<i64>,
    /// Publish date.
    pub date_at: Option<DateTime<Utc>>,
    /// Comma separated tag titles.
    pub tag_list: String,
    image_name: Option<String>,
    visible_to_all: bool,
    selected_roles: BTreeSet<String>,
    role_options: Vec<RoleOption>,
    errors: BTreeMap<EditorField, String>,
}

impl ArticleEditor {
    /// Empty form for a new article, visible to everyone.
    pub fn new() -> Self {
        Self {
            visible_to_all: true,
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing article.
    pub fn from_article(article: &Article) -> Self {
        Self {
            article_id: Some(article.article_id),
            title: article.title.clone(),
            content: article.content.clone(),
            status: article.status,
            category_id: article.category_id,
            date_at: article.date_at,
            tag_list: tags_to_string(&article.tags),
            image_name: article.image_name.clone().filter(|name| !name.is_empty()),
            visible_to_all: !article.is_restricted(),
            selected_roles: article.roles.iter().map(|role| role.slug.clone()).collect(),
            ..Self::default()
        }
    }

    /// Id of the article being edited, set once it exists on the server.
    pub fn article_id(&self) -> Option<i64> {
        self.article_id
    }

    /// True when saving updates an existing article.
    pub fn is_update(&self) -> bool {
        self.article_id.is_some()
    }

    /// Reference of the attached image.
    pub fn image_name(&self) -> Option<&str> {
        self.image_name.as_deref()
    }

    /// Attach an image reference uploaded earlier. Blank clears it.
    pub fn set_image_name(&mut self, image_name: impl Into<String>) {
        let image_name = image_name.into();
        self.image_name = (!image_name.trim().is_empty()).then_some(image_name);
    }

    /// True when no role restriction applies.
    pub fn visible_to_all(&self) -> bool {
        self.visible_to_all
    }

    /// Checking "visible to all" drops every selected role.
    pub fn set_visible_to_all(&mut self, visible: bool) {
        self.visible_to_all = visible;
        if visible {
            self.selected_roles.clear();
        }
    }

    /// Select or deselect a role by slug.
    pub fn toggle_role(&mut self, slug: &str) {
        if !self.selected_roles.remove(slug) {
            self.selected_roles.insert(slug.to_string());
        }
    }

    /// Selected role slugs, sorted.
    pub fn selected_roles(&self) -> Vec<String> {
        self.selected_roles.iter().cloned().collect()
    }

    /// Roles the picker offers.
    pub fn role_options(&self) -> &[RoleOption] {
        &self.role_options
    }

    /// Offer `roles` in the picker.
    pub fn set_role_options(&mut self, roles: Vec<RoleOption>) {
        self.role_options = roles;
    }

    /// Load role options unless some were provided already. A failing
    /// source leaves the list empty; the form stays usable.
    pub async fn load_roles(&mut self, source: &dyn RoleSource) -> &[RoleOption] {
        if self.role_options.is_empty() {
            match source.fetch_roles().await {
                Ok(roles) => self.role_options = roles,
                Err(err) => tracing::warn!("failed to fetch roles: {err}"),
            }
        }
        &self.role_options
    }

    /// Every current field error.
    pub fn errors(&self) -> &BTreeMap<EditorField, String> {
        &self.errors
    }

    /// Error shown next to `field`.
    pub fn error(&self, field: EditorField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Check title and content. Replaces every field error but the image
    /// one, which belongs to the upload.
    pub fn validate(&mut self) -> bool {
        self.errors.retain(|field, _| *field == EditorField::Image);
        if self.title.trim().is_empty() {
            self.errors
                .insert(EditorField::Title, "Title is required".to_string());
        }
        if self.content.trim().is_empty() {
            self.errors
                .insert(EditorField::Content, "Content is required".to_string());
        }
        if let Err(err) = validate_tag_list(&self.tag_list) {
            self.errors
                .insert(EditorField::TagList, err.message().to_string());
        }
        !self
            .errors
            .keys()
            .any(|field| *field != EditorField::Image)
    }

    /// Build the payload to save, or the first validation error.
    pub fn submission(&mut self) -> NewsResult<ArticleSubmission> {
        if !self.validate() {
            let message = self
                .errors
                .iter()
                .find(|(field, _)| **field != EditorField::Image)
                .map(|(_, message)| message.clone())
                .unwrap_or_default();
            return Err(NewsError::Validation(message));
        }

        let roles = if self.visible_to_all || self.selected_roles.is_empty() {
            None
        } else {
            Some(self.selected_roles())
        };
        let tag_list = self.tag_list.trim();
        let article = ArticleInput {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            image_name: self.image_name.clone(),
            status: self.status,
            category_id: self.category_id.filter(|id| *id != 0),
            date_at: self.date_at,
            tag_list: (!tag_list.is_empty()).then(|| tag_list.to_string()),
            roles,
        };

        Ok(match self.article_id {
            Some(article_id) => ArticleSubmission::Update(ArticleUpdate {
                article_id,
                article,
            }),
            None => ArticleSubmission::Create(article),
        })
    }

    /// Upload an image and attach the returned reference to the form.
    pub async fn upload_image(&mut self, api: &ArticleApi, image: ImageUpload) -> NewsResult<String> {
        if let Err(err) = image.validate() {
            self.errors
                .insert(EditorField::Image, err.message().to_string());
            return Err(err);
        }
        self.errors.remove(&EditorField::Image);

        match api.upload_image(image).await {
            Ok(reference) => {
                self.image_name = Some(reference.clone());
                Ok(reference)
            },
            Err(err) => {
                tracing::warn!("image upload failed: {err}");
                self.errors
                    .insert(EditorField::Image, "Failed to upload image".to_string());
                Err(err)
            },
        }
    }

    /// Detach the image and clear its error.
    pub fn remove_image(&mut self) {
        self.image_name = None;
        self.errors.remove(&EditorField::Image);
    }

    /// Validate and save through `store`, which reloads its list.
    pub async fn save(&mut self, store: &ArticleStore) -> NewsResult<Article> {
        match self.submission()? {
            ArticleSubmission::Create(article) => {
                let created = store.create(&article).await?;
                self.article_id = Some(created.article_id);
                Ok(created)
            },
            ArticleSubmission::Update(article) => store.update(&article).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use nnews_shared::{Role, Tag};

    use super::*;

    fn restricted_article() -> Article {
        Article {
            article_id: 5,
            category_id: Some(2),
            author_id: None,
            title: "Launch".to_string(),
            content: "<p>Body</p>".to_string(),
            image_name: Some(String::new()),
            image_url: None,
            status: ArticleStatus::Published,
            date_at: None,
            created_at: None,
            updated_at: None,
            category: None,
            tags: vec![Tag::new("rust"), Tag::new("wasm")],
            roles: vec![Role {
                slug: "staff".to_string(),
                name: "Staff".to_string(),
            }],
        }
    }

    #[test]
    fn populates_from_an_article() {
        let editor = ArticleEditor::from_article(&restricted_article());
        assert!(editor.is_update());
        assert_eq!(editor.tag_list, "rust, wasm");
        assert!(!editor.visible_to_all());
        assert_eq!(editor.selected_roles(), vec!["staff".to_string()]);
        assert_eq!(editor.image_name(), None);
    }

    #[test]
    fn visible_to_all_drops_roles() {
        let mut editor = ArticleEditor::from_article(&restricted_article());
        editor.toggle_role("editors");
        assert_eq!(editor.selected_roles().len(), 2);
        editor.toggle_role("editors");
        assert_eq!(editor.selected_roles().len(), 1);

        editor.set_visible_to_all(true);
        assert!(editor.selected_roles().is_empty());
    }

    #[test]
    fn submission_trims_and_omits_blank_fields() {
        let mut editor = ArticleEditor::new();
        editor.title = "  Hello  ".to_string();
        editor.content = " body ".to_string();
        editor.category_id = Some(0);
        editor.tag_list = "  ".to_string();

        let ArticleSubmission::Create(article) = editor.submission().expect("valid form") else {
            panic!("new article should be created");
        };
        assert_eq!(article.title, "Hello");
        assert_eq!(article.content, "body");
        assert_eq!(article.category_id, None);
        assert_eq!(article.tag_list, None);
        assert_eq!(article.roles, None);
    }

    #[test]
    fn invalid_forms_report_field_errors() {
        let mut editor = ArticleEditor::new();
        editor.tag_list = "rust, ,wasm".to_string();
        assert!(editor.submission().is_err());
        assert_eq!(editor.error(EditorField::Title), Some("Title is required"));
        assert_eq!(editor.error(EditorField::Content), Some("Content is required"));
        assert!(editor.error(EditorField::TagList).is_some());
    }

    #[test]
    fn restricted_update_keeps_roles() {
        let mut editor = ArticleEditor::from_article(&restricted_article());
        let ArticleSubmission::Update(update) = editor.submission().expect("valid form") else {
            panic!("existing article should be updated");
        };
        assert_eq!(update.article_id, 5);
        assert_eq!(update.article.roles, Some(vec!["staff".to_string()]));
        assert_eq!(update.article.tag_list.as_deref(), Some("rust, wasm"));
    }
}
