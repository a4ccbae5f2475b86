//! Response records as the server sends them, and their conversion into
//! the public model. Dates arrive as strings and are parsed here; nothing
//! past this module sees a raw date string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nnews_shared::{
    Article, ArticleStatus, Category, NewsError, NewsResult, PagedResult, Role, Tag,
};
use serde::Deserialize;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryRecord {
    category_id: i64,
    parent_id: Option<i64>,
    title: String,
    created_at: Option<String>,
    updated_at: Option<String>,
    article_count: Option<i64>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = NewsError;

    fn try_from(record: CategoryRecord) -> NewsResult<Self> {
        Ok(Category {
            category_id: record.category_id,
            parent_id: record.parent_id,
            title: record.title,
            created_at: parse_optional(record.created_at)?,
            updated_at: parse_optional(record.updated_at)?,
            article_count: record.article_count,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArticleRecord {
    article_id: i64,
    category_id: Option<i64>,
    author_id: Option<i64>,
    title: String,
    content: Option<String>,
    image_name: Option<String>,
    image_url: Option<String>,
    status: ArticleStatus,
    date_at: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    category: Option<CategoryRecord>,
    tags: Option<Vec<Tag>>,
    roles: Option<Vec<Role>>,
}

impl TryFrom<ArticleRecord> for Article {
    type Error = NewsError;

    fn try_from(record: ArticleRecord) -> NewsResult<Self> {
        Ok(Article {
            article_id: record.article_id,
            category_id: record.category_id,
            author_id: record.author_id,
            title: record.title,
            content: record.content.unwrap_or_default(),
            image_name: record.image_name,
            image_url: record.image_url,
            status: record.status,
            date_at: parse_optional(record.date_at)?,
            created_at: parse_optional(record.created_at)?,
            updated_at: parse_optional(record.updated_at)?,
            category: record.category.map(Category::try_from).transpose()?,
            tags: record.tags.unwrap_or_default(),
            roles: record.roles.unwrap_or_default(),
        })
    }
}

/// Paged envelope. The server's `hasPrevious`/`hasNext` are ignored, the
/// model derives them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PagedRecord<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    page: u32,
    page_size: u32,
    total_count: u64,
    total_pages: u32,
}

impl<T> PagedRecord<T> {
    pub(crate) fn normalize<U>(self) -> NewsResult<PagedResult<U>>
    where
        U: TryFrom<T, Error = NewsError>,
    {
        PagedResult {
            items: self.items,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
        .try_map(U::try_from)
    }
}

pub(crate) fn normalize_all<T, U>(records: Vec<T>) -> NewsResult<Vec<U>>
where
    U: TryFrom<T, Error = NewsError>,
{
    records.into_iter().map(U::try_from).collect()
}

/// Parse a date string sent by the API.
///
/// Accepts RFC 3339, naive date-times (read as UTC, with `T` or a space
/// separator and optional fraction) and bare dates (UTC midnight). Blank
/// strings mean "no date".
pub fn parse_datetime(raw: &str) -> NewsResult<Option<DateTime<Utc>>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(parsed.and_utc()));
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight.and_utc()));
    }

    Err(NewsError::Decode(format!("invalid date value `{value}`")))
}

fn parse_optional(raw: Option<String>) -> NewsResult<Option<DateTime<Utc>>> {
    match raw {
        Some(value) => parse_datetime(&value),
        None => Ok(None),
    }
}
