//! Resource clients. Each operation maps to exactly one HTTP call on the
//! shared [`HttpClient`](crate::HttpClient).

mod article;
mod category;
mod tag;

use bytes::Bytes;
use nnews_shared::{validators::validate_image_upload, NewsResult};

pub use self::{article::ArticleApi, category::CategoryApi, tag::TagApi};
use crate::http::FilePart;

pub(crate) mod endpoints {
    pub const ARTICLES: &str = "/article";
    pub const ARTICLES_FILTER: &str = "/article/filter";
    pub const ARTICLES_AI_INSERT: &str = "/article/insertWithAI";
    pub const ARTICLES_AI_UPDATE: &str = "/article/updateWithAI";
    pub const IMAGE_UPLOAD: &str = "/Image/uploadImage";
    pub const CATEGORIES: &str = "/category";
    pub const CATEGORIES_FILTER: &str = "/category/filter";
    pub const TAGS: &str = "/tag";

    pub fn article_by_id(article_id: i64) -> String {
        format!("{ARTICLES}/{article_id}")
    }

    pub fn category_by_id(category_id: i64) -> String {
        format!("{CATEGORIES}/{category_id}")
    }

    pub fn tag_by_id(tag_id: i64) -> String {
        format!("{TAGS}/{tag_id}")
    }

    // merge 路由在服务端是大写的 Tag 控制器
    pub fn tag_merge(source_tag_id: i64, target_tag_id: i64) -> String {
        format!("/Tag/merge/{source_tag_id}/{target_tag_id}")
    }
}

/// An image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent with the multipart part.
    pub file_name: String,
    /// MIME type, must be `image/*`.
    pub content_type: String,
    /// File content.
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Wrap file content picked for upload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Content type must be `image/*` and the payload at most 5 MiB.
    pub fn validate(&self) -> NewsResult<()> {
        validate_image_upload(&self.content_type, self.bytes.len() as u64)
    }

    pub(crate) fn into_file_part(self) -> FilePart {
        FilePart {
            field: "file".to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}

pub(crate) fn push_page(query: &mut Vec<(String, String)>, page: u32, page_size: u32) {
    query.push(("page".to_string(), page.to_string()));
    query.push(("pageSize".to_string(), page_size.to_string()));
}

pub(crate) fn push_roles(query: &mut Vec<(String, String)>, roles: &[String]) {
    let roles = roles
        .iter()
        .map(|role| role.trim())
        .filter(|role| !role.is_empty())
        .collect::<Vec<_>>();
    if !roles.is_empty() {
        query.push(("roles".to_string(), roles.join(",")));
    }
}
