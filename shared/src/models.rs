//! Article, category and tag model, payloads and list queries.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NewsError, NewsResult};

/// Page requested when the caller does not pick one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size requested when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// 文章状态，线上以整数传输
/// Publication status of an article, sent over the wire as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ArticleStatus {
    /// Work in progress, not visible to readers.
    #[default]
    Draft = 0,
    /// Live.
    Published = 1,
    /// Taken down but kept.
    Archived = 2,
    /// Goes live at `date_at`.
    Scheduled = 3,
    /// Waiting for an editor.
    Review = 4,
}

impl ArticleStatus {
    /// Every status, in wire-code order.
    pub const ALL: [ArticleStatus; 5] = [
        ArticleStatus::Draft,
        ArticleStatus::Published,
        ArticleStatus::Archived,
        ArticleStatus::Scheduled,
        ArticleStatus::Review,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "Draft",
            ArticleStatus::Published => "Published",
            ArticleStatus::Archived => "Archived",
            ArticleStatus::Scheduled => "Scheduled",
            ArticleStatus::Review => "Review",
        }
    }
}

impl From<ArticleStatus> for u8 {
    fn from(status: ArticleStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for ArticleStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ArticleStatus::ALL
            .into_iter()
            .find(|status| *status as u8 == code)
            .ok_or_else(|| format!("unknown article status code {code}"))
    }
}

impl FromStr for ArticleStatus {
    type Err = NewsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if let Ok(code) = normalized.parse::<u8>() {
            return ArticleStatus::try_from(code).map_err(NewsError::Validation);
        }
        ArticleStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| NewsError::validation(format!("unknown article status `{normalized}`")))
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A visibility role an article can be restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// Stable identifier used in filters and payloads.
    pub slug: String,
    /// Display name.
    pub name: String,
}

/// A tag. `tag_id` is absent until the server has created it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Server id, `None` for unsaved tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<i64>,
    /// Display title.
    pub title: String,
    /// URL slug, derived from the title by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Number of articles carrying the tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_count: Option<i64>,
}

impl Tag {
    /// A tag that has not been saved yet.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A category. Categories form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Server id.
    pub category_id: i64,
    /// Parent category, `None` at the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Display title.
    pub title: String,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of articles filed under the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_count: Option<i64>,
}

impl Category {
    /// True for top-level categories.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

// 完整文章数据模型，所有日期已在 API 边界解析
/// A fully normalized article. Every date has already been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Server id.
    pub article_id: i64,
    /// Category the article is filed under.
    pub category_id: Option<i64>,
    /// Author, when the server reports one.
    pub author_id: Option<i64>,
    /// Headline.
    pub title: String,
    /// Rich text or markdown body.
    pub content: String,
    /// Reference of the cover image returned by the upload endpoint.
    pub image_name: Option<String>,
    /// Public URL of the cover image.
    pub image_url: Option<String>,
    /// Publication status.
    pub status: ArticleStatus,
    /// Publish date.
    pub date_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// The category itself, when the server embeds it.
    pub category: Option<Category>,
    /// Tags attached to the article.
    pub tags: Vec<Tag>,
    /// Roles the article is restricted to. Empty means public.
    pub roles: Vec<Role>,
}

impl Article {
    /// True when the article is restricted to specific roles.
    pub fn is_restricted(&self) -> bool {
        !self.roles.is_empty()
    }
}

/// One page of items plus the counters needed to navigate.
///
/// Navigation flags are derived from `page` and `total_pages` instead of
/// being stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Number of items across every page.
    pub total_count: u64,
    /// Number of pages.
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    /// True iff `page > 1`.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// True iff `page < total_pages`.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// True when this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the page counters.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<PagedResult<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(PagedResult {
            items,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        })
    }
}

/// Payload for creating a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInput {
    /// Display title.
    pub title: String,
    /// Optional slug. The server derives one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl TagInput {
    /// Unsaved tag with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
        }
    }

    /// Set an explicit slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Title is required.
    pub fn validate(&self) -> NewsResult<()> {
        require_text(&self.title, "Title is required")
    }
}

/// Payload for updating a tag. The id travels in the body, not the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUpdate {
    /// Tag to update.
    pub tag_id: i64,
    /// New values.
    #[serde(flatten)]
    pub tag: TagInput,
}

impl TagUpdate {
    /// Same rules as [`TagInput::validate`].
    pub fn validate(&self) -> NewsResult<()> {
        self.tag.validate()
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Display title.
    pub title: String,
    /// Parent category, `None` for a root category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl CategoryInput {
    /// Root category with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parent_id: None,
        }
    }

    /// Nest under `parent_id`.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Title is required.
    pub fn validate(&self) -> NewsResult<()> {
        require_text(&self.title, "Title is required")
    }
}

/// Payload for updating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    /// Category to update.
    pub category_id: i64,
    /// New values.
    #[serde(flatten)]
    pub category: CategoryInput,
}

impl CategoryUpdate {
    /// Title is required and a category cannot be its own parent.
    pub fn validate(&self) -> NewsResult<()> {
        self.category.validate()?;
        if self.category.parent_id == Some(self.category_id) {
            return Err(NewsError::validation("A category cannot be its own parent"));
        }
        Ok(())
    }
}

/// Payload for creating an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    /// Headline.
    pub title: String,
    /// Body.
    pub content: String,
    /// Reference returned by the image upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    /// Publication status, draft unless set.
    #[serde(default)]
    pub status: ArticleStatus,
    /// Category to file the article under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// Publish date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_at: Option<DateTime<Utc>>,
    /// Comma separated tag titles; the server creates missing tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<String>,
    /// Role slugs. Absent means visible to everyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl ArticleInput {
    /// Draft with only a title and a body.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Title and content are required.
    pub fn validate(&self) -> NewsResult<()> {
        require_text(&self.title, "Title is required")?;
        require_text(&self.content, "Content is required")
    }
}

/// Payload for updating an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    /// Article to update.
    pub article_id: i64,
    /// New values.
    #[serde(flatten)]
    pub article: ArticleInput,
}

impl ArticleUpdate {
    /// Same rules as [`ArticleInput::validate`].
    pub fn validate(&self) -> NewsResult<()> {
        self.article.validate()
    }
}

/// Body of the AI create/update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiArticleRequest {
    /// Article to rewrite. Required by the update endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<i64>,
    /// What to write, or what to change.
    pub prompt: String,
    /// Ask for a cover image as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_image: Option<bool>,
}

/// Query for the article list. Non-empty `roles` switches to the filter
/// endpoint, where `category_id` is sent as the parent category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Category filter; the parent category on the filter endpoint.
    pub category_id: Option<i64>,
    /// Role slugs. Non-empty switches to the filter endpoint.
    pub roles: Vec<String>,
    /// 1-based page, [`DEFAULT_PAGE`] when unset.
    pub page: Option<u32>,
    /// Page size, [`DEFAULT_PAGE_SIZE`] when unset.
    pub page_size: Option<u32>,
}

impl ArticleQuery {
    /// Query for one page of every article.
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Restrict to one category.
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restrict to articles visible to `roles`.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Page to request.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Page size to request.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Query for the category list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    /// Role slugs. Non-empty switches to the filter endpoint.
    pub roles: Vec<String>,
    /// Only children of this category.
    pub parent_id: Option<i64>,
    /// Applied on the client, against titles.
    pub search_term: Option<String>,
}

/// Query for the tag list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    /// Applied on the client, against titles and slugs.
    pub search_term: Option<String>,
}

impl TagQuery {
    /// Query matching `term` against titles and slugs.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
        }
    }
}

fn require_text(value: &str, message: &str) -> NewsResult<()> {
    if value.trim().is_empty() {
        return Err(NewsError::validation(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_round_trips_through_its_code() {
        assert_eq!(serde_json::to_value(ArticleStatus::Scheduled).expect("serialize"), json!(3));
        let status: ArticleStatus = serde_json::from_value(json!(4)).expect("decode review");
        assert_eq!(status, ArticleStatus::Review);
        assert!(serde_json::from_value::<ArticleStatus>(json!(5)).is_err());
    }

    #[test]
    fn status_parses_labels_and_codes() {
        assert_eq!("published".parse::<ArticleStatus>().expect("label"), ArticleStatus::Published);
        assert_eq!(" 2 ".parse::<ArticleStatus>().expect("code"), ArticleStatus::Archived);
        assert!("deleted".parse::<ArticleStatus>().is_err());
    }

    #[test]
    fn paged_result_flags_follow_page_counters() {
        let page = |page, total_pages| PagedResult::<u8> {
            items: vec![],
            page,
            page_size: 10,
            total_count: 0,
            total_pages,
        };
        assert!(!page(1, 1).has_next());
        assert!(!page(1, 1).has_previous());
        assert!(page(1, 3).has_next());
        assert!(page(2, 3).has_previous());
        assert!(!page(3, 3).has_next());
        // an empty result reports zero pages
        assert!(!page(1, 0).has_next());
    }

    #[test]
    fn update_payloads_flatten_the_input() {
        let update = ArticleUpdate {
            article_id: 7,
            article: ArticleInput {
                tag_list: Some("rust, wasm".to_string()),
                ..ArticleInput::new("Title", "Body")
            },
        };
        let value = serde_json::to_value(&update).expect("serialize update");
        assert_eq!(value["articleId"], json!(7));
        assert_eq!(value["title"], json!("Title"));
        assert_eq!(value["status"], json!(0));
        assert_eq!(value["tagList"], json!("rust, wasm"));
        assert!(value.get("imageName").is_none());
        assert!(value.get("roles").is_none());

        let tag = TagUpdate {
            tag_id: 3,
            tag: TagInput::new("Tech"),
        };
        assert_eq!(
            serde_json::to_value(&tag).expect("serialize tag"),
            json!({"tagId": 3, "title": "Tech"})
        );
    }

    #[test]
    fn category_cannot_be_its_own_parent() {
        let update = CategoryUpdate {
            category_id: 4,
            category: CategoryInput::new("News").with_parent(4),
        };
        assert!(update.validate().is_err());

        let update = CategoryUpdate {
            category_id: 4,
            category: CategoryInput::new("News").with_parent(1),
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn blank_titles_are_rejected() {
        assert!(TagInput::new("   ").validate().is_err());
        assert!(CategoryInput::new("").validate().is_err());
        assert!(ArticleInput::new("Title", " \n").validate().is_err());
        assert!(ArticleInput::new("Title", "Body").validate().is_ok());
    }
}
